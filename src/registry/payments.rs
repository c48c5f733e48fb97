use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{PaymentNameUpdater, RegistryError};
use crate::model::{NewPayment, Payment, PaymentPatch, PaymentStatus, PaymentType};
use crate::seed;
use crate::store::{load_or_seed, save_snapshot, SnapshotStore, StoreError, PAYMENTS_KEY};

/// Narrowing used by the payments list screen. Empty fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
}

impl PaymentFilter {
    fn matches(&self, p: &Payment) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let in_name = p.teacher_name.to_lowercase().contains(&term);
            let in_desc = p
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !in_name && !in_desc {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != p.status) {
            return false;
        }
        if self.payment_type.is_some_and(|t| t != p.payment_type) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub count: usize,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
}

impl PaymentSummary {
    pub fn of<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        let mut out = Self::default();
        for p in payments {
            out.count += 1;
            out.total_amount += p.amount;
            match p.status {
                PaymentStatus::Paid => out.paid_amount += p.amount,
                PaymentStatus::Pending => out.pending_amount += p.amount,
                PaymentStatus::Overdue => {}
            }
        }
        out
    }
}

pub struct PaymentRegistry {
    store: Rc<dyn SnapshotStore>,
    payments: Vec<Payment>,
}

impl PaymentRegistry {
    pub fn load(store: Rc<dyn SnapshotStore>) -> Result<Self, StoreError> {
        let payments = load_or_seed(store.as_ref(), PAYMENTS_KEY, seed::payments)?;
        info!(count = payments.len(), "payment registry hydrated");
        Ok(Self { store, payments })
    }

    /// Payments in insertion order.
    pub fn list(&self) -> &[Payment] {
        &self.payments
    }

    pub fn get(&self, id: &str) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn list_by_teacher(&self, teacher_id: &str) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.teacher_id == teacher_id)
            .collect()
    }

    pub fn search(&self, filter: &PaymentFilter) -> Vec<&Payment> {
        self.payments.iter().filter(|p| filter.matches(p)).collect()
    }

    /// The teacher id is stored as given; nothing checks that it exists.
    pub fn add(&mut self, new: NewPayment) -> Result<Payment, RegistryError> {
        let payment = new.into_payment(Uuid::new_v4().to_string());
        let mut next = self.payments.clone();
        next.push(payment.clone());
        self.commit(next)?;
        info!(payment_id = %payment.id, teacher_id = %payment.teacher_id, "payment added");
        Ok(payment)
    }

    pub fn update(&mut self, id: &str, patch: PaymentPatch) -> Result<Payment, RegistryError> {
        let idx = self.position(id)?;
        let mut next = self.payments.clone();
        patch.apply_to(&mut next[idx]);
        let updated = next[idx].clone();
        self.commit(next)?;
        info!(payment_id = id, "payment updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<Payment, RegistryError> {
        let idx = self.position(id)?;
        let mut next = self.payments.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        info!(payment_id = id, "payment deleted");
        Ok(removed)
    }

    /// Overwrites the copied name on every payment of `teacher_id`. Saves once
    /// after the whole pass, and not at all when nothing matched.
    pub fn rename_teacher_in(&mut self, teacher_id: &str, new_name: &str) -> Result<usize, StoreError> {
        let mut next = self.payments.clone();
        let mut touched = 0usize;
        for p in next.iter_mut().filter(|p| p.teacher_id == teacher_id) {
            p.teacher_name = new_name.to_string();
            touched += 1;
        }
        if touched == 0 {
            return Ok(0);
        }
        self.commit(next)?;
        debug!(teacher_id, touched, "teacher name rewritten in payments");
        Ok(touched)
    }

    pub fn delete_all_for_teacher(&mut self, teacher_id: &str) -> Result<usize, StoreError> {
        let before = self.payments.len();
        let next: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.teacher_id != teacher_id)
            .cloned()
            .collect();
        let removed = before - next.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(next)?;
        info!(teacher_id, removed, "payments deleted for teacher");
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, RegistryError> {
        self.payments
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RegistryError::not_found("payment", id))
    }

    fn commit(&mut self, next: Vec<Payment>) -> Result<(), StoreError> {
        save_snapshot(self.store.as_ref(), PAYMENTS_KEY, &next)?;
        self.payments = next;
        Ok(())
    }
}

impl PaymentNameUpdater for PaymentRegistry {
    fn rename_teacher(&mut self, teacher_id: &str, new_name: &str) -> Result<usize, StoreError> {
        self.rename_teacher_in(teacher_id, new_name)
    }
}
