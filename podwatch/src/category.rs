use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Closed set of podcast categories. The wire names are fixed; anything
/// outside this set is rejected at validation time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum Category {
    #[serde(rename = "News & Politics")]
    NewsPolitics,
    #[serde(rename = "Business & Finance")]
    BusinessFinance,
    Technology,
    Health,
    Comedy,
    Science,
    History,
    Education,
    Entertainment,
    Sports,
    #[serde(rename = "Society & Culture")]
    SocietyCulture,
    Music,
    Travel,
    Food,
    Gaming,
    #[serde(rename = "Art & Design")]
    ArtDesign,
    Other,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::NewsPolitics,
        Category::BusinessFinance,
        Category::Technology,
        Category::Health,
        Category::Comedy,
        Category::Science,
        Category::History,
        Category::Education,
        Category::Entertainment,
        Category::Sports,
        Category::SocietyCulture,
        Category::Music,
        Category::Travel,
        Category::Food,
        Category::Gaming,
        Category::ArtDesign,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NewsPolitics => "News & Politics",
            Category::BusinessFinance => "Business & Finance",
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Comedy => "Comedy",
            Category::Science => "Science",
            Category::History => "History",
            Category::Education => "Education",
            Category::Entertainment => "Entertainment",
            Category::Sports => "Sports",
            Category::SocietyCulture => "Society & Culture",
            Category::Music => "Music",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Gaming => "Gaming",
            Category::ArtDesign => "Art & Design",
            Category::Other => "Other",
        }
    }

    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == name)
    }

    /// Comma-joined list of every wire name, used in validation messages.
    pub fn joined() -> String {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        names.join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| format!("Category must be one of: {}", Category::joined()))
    }
}
