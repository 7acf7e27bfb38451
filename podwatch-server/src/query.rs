use std::cmp::Ordering;

use podwatch::Podcast;
use serde::Deserialize;
use serde_json::Value;

/// Query-string conventions for the list endpoint: free-text search plus
/// the generic filter / sort / field-limit trio. Filterable fields are
/// category and rating; sort keys accept a leading `-` for descending.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub rating_gte: Option<f64>,
    pub rating_lte: Option<f64>,
    pub sort: Option<String>,
    pub fields: Option<String>,
}

const DEFAULT_SORT: &str = "-createdAt";

/// Case-insensitive substring match over title, host and description.
pub fn matches_search(podcast: &Podcast, term: &str) -> bool {
    let needle = term.to_lowercase();
    podcast.title.to_lowercase().contains(&needle)
        || podcast.host.to_lowercase().contains(&needle)
        || podcast.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&needle))
}

fn compare_by(a: &Podcast, b: &Podcast, key: &str) -> Ordering {
    match key {
        "title" => a.title.cmp(&b.title),
        "host" => a.host.cmp(&b.host),
        "category" => a.category.as_str().cmp(b.category.as_str()),
        "rating" => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
        "createdAt" => a.created_at.cmp(&b.created_at),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        // unknown keys are ignored, matching the loose query convention
        _ => Ordering::Equal,
    }
}

fn project(podcast: &Podcast, fields: &[&str]) -> Value {
    let mut value = serde_json::to_value(podcast).unwrap_or(Value::Null);
    if let Value::Object(ref mut map) = value {
        map.retain(|key, _| key == "id" || fields.contains(&key.as_str()));
    }
    value
}

impl ListQuery {
    /// Apply search, filters, sort and field projection in that order.
    pub fn apply(&self, mut podcasts: Vec<Podcast>) -> Vec<Value> {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            podcasts.retain(|p| matches_search(p, term));
        }
        if let Some(category) = self.category.as_deref() {
            podcasts.retain(|p| p.category.as_str() == category);
        }
        if let Some(rating) = self.rating {
            podcasts.retain(|p| p.rating == Some(rating));
        }
        if let Some(floor) = self.rating_gte {
            podcasts.retain(|p| p.rating.is_some_and(|r| r >= floor));
        }
        if let Some(ceiling) = self.rating_lte {
            podcasts.retain(|p| p.rating.is_some_and(|r| r <= ceiling));
        }

        let sort = self.sort.as_deref().unwrap_or(DEFAULT_SORT);
        let keys: Vec<&str> = sort.split(',').map(str::trim).filter(|k| !k.is_empty()).collect();
        podcasts.sort_by(|a, b| {
            for key in &keys {
                let (key, descending) = match key.strip_prefix('-') {
                    Some(stripped) => (stripped, true),
                    None => (*key, false),
                };
                let ordering = compare_by(a, b, key);
                let ordering = if descending { ordering.reverse() } else { ordering };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });

        match self.fields.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(fields) => {
                let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
                podcasts.iter().map(|p| project(p, &fields)).collect()
            }
            None => podcasts.iter().map(|p| serde_json::to_value(p).unwrap_or(Value::Null)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podwatch::Category;

    fn podcast(id: &str, title: &str, category: Category, rating: Option<f64>, created_at: u64) -> Podcast {
        Podcast {
            id: id.into(),
            title: title.into(),
            host: "Somebody".into(),
            url: "https://open.spotify.com/show/x".into(),
            category,
            rating,
            description: Some(format!("{title} weekly episodes")),
            created_at,
            updated_at: None,
        }
    }

    fn fixture() -> Vec<Podcast> {
        vec![
            podcast("a", "Science Friday", Category::Science, Some(4.5), 10),
            podcast("b", "Hard Fork", Category::Technology, Some(4.0), 20),
            podcast("c", "Planet Money", Category::BusinessFinance, None, 30),
        ]
    }

    #[test]
    fn default_order_is_created_at_descending() {
        let out = ListQuery::default().apply(fixture());
        let ids: Vec<&str> = out.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let query = ListQuery { search: Some("friday".into()), ..Default::default() };
        let out = query.apply(fixture());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["title"], "Science Friday");

        // matches inside the description too
        let query = ListQuery { search: Some("EPISODES".into()), ..Default::default() };
        assert_eq!(query.apply(fixture()).len(), 3);
    }

    #[test]
    fn category_and_rating_filters() {
        let query = ListQuery { category: Some("Technology".into()), ..Default::default() };
        let out = query.apply(fixture());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "b");

        let query = ListQuery { rating_gte: Some(4.2), ..Default::default() };
        let out = query.apply(fixture());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "a");
    }

    #[test]
    fn sort_keys_chain_and_reverse() {
        let query = ListQuery { sort: Some("-rating,title".into()), ..Default::default() };
        let out = query.apply(fixture());
        let ids: Vec<&str> = out.iter().map(|v| v["id"].as_str().unwrap()).collect();
        // None rating sorts lowest, so it lands last under descending
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn field_projection_always_keeps_id() {
        let query = ListQuery { fields: Some("title,rating".into()), ..Default::default() };
        let out = query.apply(fixture());
        let first = out[0].as_object().unwrap();
        assert!(first.contains_key("id"));
        assert!(first.contains_key("title"));
        assert!(!first.contains_key("host"));
        assert!(!first.contains_key("url"));
    }
}
