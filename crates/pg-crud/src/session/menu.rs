use std::str::FromStr;

use crate::error::CrudError;

/// Top-level menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Create,
    Read,
    Update,
    Delete,
    List,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Create,
        MenuChoice::Read,
        MenuChoice::Update,
        MenuChoice::Delete,
        MenuChoice::List,
        MenuChoice::Exit,
    ];

    pub fn number(&self) -> u8 {
        match self {
            MenuChoice::Create => 1,
            MenuChoice::Read => 2,
            MenuChoice::Update => 3,
            MenuChoice::Delete => 4,
            MenuChoice::List => 5,
            MenuChoice::Exit => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Create => "CREATE",
            MenuChoice::Read => "READ",
            MenuChoice::Update => "UPDATE",
            MenuChoice::Delete => "DELETE",
            MenuChoice::List => "LIST",
            MenuChoice::Exit => "EXIT",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = CrudError;

    /// Accepts the entry number or its label in any case.
    fn from_str(s: &str) -> Result<Self, CrudError> {
        let s = s.trim();
        MenuChoice::ALL
            .into_iter()
            .find(|c| s == c.number().to_string() || s.eq_ignore_ascii_case(c.label()))
            .ok_or_else(|| CrudError::Validation(format!("Invalid option '{}'", s)))
    }
}
