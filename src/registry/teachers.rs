use std::rc::Rc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{PaymentNameUpdater, RegistryError};
use crate::model::{NewTeacher, Teacher, TeacherPatch};
use crate::seed;
use crate::store::{load_or_seed, save_snapshot, SnapshotStore, StoreError, TEACHERS_KEY};

pub struct TeacherRegistry {
    store: Rc<dyn SnapshotStore>,
    teachers: Vec<Teacher>,
}

impl TeacherRegistry {
    pub fn load(store: Rc<dyn SnapshotStore>) -> Result<Self, StoreError> {
        let teachers = load_or_seed(store.as_ref(), TEACHERS_KEY, seed::teachers)?;
        info!(count = teachers.len(), "teacher registry hydrated");
        Ok(Self { store, teachers })
    }

    /// Teachers in insertion order.
    pub fn list(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn get(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, new: NewTeacher) -> Result<Teacher, RegistryError> {
        let teacher = new.into_teacher(Uuid::new_v4().to_string());
        let mut next = self.teachers.clone();
        next.push(teacher.clone());
        self.commit(next)?;
        info!(teacher_id = %teacher.id, "teacher added");
        Ok(teacher)
    }

    /// Merges `patch` into the teacher and saves. When the patch carries a
    /// name, `payments` is told about it after the teacher snapshot is saved.
    pub fn update(
        &mut self,
        id: &str,
        patch: TeacherPatch,
        payments: &mut dyn PaymentNameUpdater,
    ) -> Result<Teacher, RegistryError> {
        let idx = self.position(id)?;
        let new_name = patch.name.clone();

        let mut next = self.teachers.clone();
        patch.apply_to(&mut next[idx]);
        let updated = next[idx].clone();
        self.commit(next)?;
        info!(teacher_id = id, "teacher updated");

        if let Some(name) = new_name {
            let renamed = payments.rename_teacher(id, &name)?;
            debug!(teacher_id = id, renamed, "teacher name pushed to payments");
        }
        Ok(updated)
    }

    /// Removes the teacher. Payments that reference it are left alone.
    pub fn delete(&mut self, id: &str) -> Result<Teacher, RegistryError> {
        let idx = self.position(id)?;
        let mut next = self.teachers.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        info!(teacher_id = id, "teacher deleted");
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, RegistryError> {
        self.teachers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RegistryError::not_found("teacher", id))
    }

    fn commit(&mut self, next: Vec<Teacher>) -> Result<(), StoreError> {
        save_snapshot(self.store.as_ref(), TEACHERS_KEY, &next)?;
        self.teachers = next;
        Ok(())
    }
}
