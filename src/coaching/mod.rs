pub mod drill_scorer;
pub mod feedback;
pub mod issue_tags;
pub mod types;
