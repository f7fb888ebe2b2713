//! Agent entity
//!
//! Support staff read-model. The agent roster is owned by the external
//! directory; the core only reads active agents and their expertise tags.
//! Workload is derived from ticket counts, never stored here.

use crate::domain::value_objects::{AgentId, Category};

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub expertise: Vec<Category>,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::from_string(id),
            name: name.into(),
            email: email.into(),
            active: true,
            expertise: vec![],
        }
    }

    pub fn with_expertise(mut self, expertise: Vec<Category>) -> Self {
        self.expertise = expertise;
        self
    }

    pub fn has_expertise(&self, category: Category) -> bool {
        self.expertise.contains(&category)
    }
}
