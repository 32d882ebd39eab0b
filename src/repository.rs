//! Arena-style class storage.
//!
//! The surrounding layer owns a repository instance and injects it where
//! needed; there is no global state. Operations are synchronous: callers
//! serialize concurrent writes to the same class themselves.

use std::collections::HashMap;

use uuid::Uuid;

use crate::class::Class;

pub trait ClassRepository: Send + Sync {
    /// Stores a class and returns its id.
    fn insert(&mut self, class: Class) -> Uuid;

    fn get(&self, id: Uuid) -> Option<&Class>;

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Class>;

    /// Removes and returns the class; enrollments cascade with it.
    fn remove(&mut self, id: Uuid) -> Option<Class>;

    fn list(&self) -> Vec<(Uuid, &Class)>;
}

/// In-memory repository keyed by class id.
#[derive(Default)]
pub struct InMemoryClassRepository {
    classes: HashMap<Uuid, Class>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassRepository for InMemoryClassRepository {
    fn insert(&mut self, class: Class) -> Uuid {
        let id = Uuid::new_v4();
        self.classes.insert(id, class);
        id
    }

    fn get(&self, id: Uuid) -> Option<&Class> {
        self.classes.get(&id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Class> {
        self.classes.get_mut(&id)
    }

    fn remove(&mut self, id: Uuid) -> Option<Class> {
        self.classes.remove(&id)
    }

    fn list(&self) -> Vec<(Uuid, &Class)> {
        self.classes.iter().map(|(id, class)| (*id, class)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;
    use crate::specification::AverageSpecification;
    use crate::student::Student;

    fn class(topic: &str) -> Class {
        let spec = AverageSpecification::new(
            HashMap::from([(Grade::Ma, 10.0), (Grade::Mpa, 7.0), (Grade::Mana, 0.0)]),
            HashMap::from([("Requirements".to_string(), 1.0)]),
        )
        .unwrap();
        Class::new(topic, 1, 2026, spec)
    }

    #[test]
    fn test_insert_and_get() {
        let mut repo = InMemoryClassRepository::new();
        let id = repo.insert(class("Software Engineering"));

        assert_eq!(repo.get(id).unwrap().topic, "Software Engineering");
        assert!(repo.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut repo = InMemoryClassRepository::new();
        let id = repo.insert(class("Software Engineering"));

        repo.get_mut(id)
            .unwrap()
            .enroll(Student::new("123", "Ana"))
            .unwrap();
        assert_eq!(repo.get(id).unwrap().enrollments().len(), 1);
    }

    #[test]
    fn test_remove_cascades() {
        let mut repo = InMemoryClassRepository::new();
        let id = repo.insert(class("Software Engineering"));

        assert!(repo.remove(id).is_some());
        assert!(repo.remove(id).is_none());
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_list_returns_every_class() {
        let mut repo = InMemoryClassRepository::new();
        repo.insert(class("A"));
        repo.insert(class("B"));
        assert_eq!(repo.list().len(), 2);
    }
}
