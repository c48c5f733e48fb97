//! Teacher and payment records as stored in snapshots and sent over IPC.
//!
//! Field names follow the UI's camelCase JSON. `New*` types are what callers
//! hand to `add` (no id); `*Patch` types carry a partial update in which every
//! field is optional and an absent field means "keep the current value".

use chrono::NaiveDate;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeacherStatus {
    Active,
    Inactive,
    OnLeave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub experience: u32,
    /// Monthly salary.
    #[serde(deserialize_with = "non_negative")]
    pub salary: f64,
    pub status: TeacherStatus,
    pub join_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub department: String,
    pub qualifications: Vec<String>,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub experience: u32,
    #[serde(deserialize_with = "non_negative")]
    pub salary: f64,
    pub status: TeacherStatus,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub avatar: Option<String>,
    pub department: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    pub address: Address,
}

impl NewTeacher {
    pub fn into_teacher(self, id: String) -> Teacher {
        Teacher {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            experience: self.experience,
            salary: self.salary,
            status: self.status,
            join_date: self.join_date,
            avatar: self.avatar,
            department: self.department,
            qualifications: self.qualifications,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub experience: Option<u32>,
    #[serde(default, deserialize_with = "non_negative_opt")]
    pub salary: Option<f64>,
    pub status: Option<TeacherStatus>,
    pub join_date: Option<NaiveDate>,
    /// `null` clears the avatar; an absent field keeps it.
    #[serde(default, deserialize_with = "serde_with::rust::double_option::deserialize")]
    pub avatar: Option<Option<String>>,
    pub department: Option<String>,
    pub qualifications: Option<Vec<String>>,
    pub address: Option<Address>,
}

impl TeacherPatch {
    pub fn apply_to(self, t: &mut Teacher) {
        if let Some(v) = self.name {
            t.name = v;
        }
        if let Some(v) = self.email {
            t.email = v;
        }
        if let Some(v) = self.phone {
            t.phone = v;
        }
        if let Some(v) = self.subject {
            t.subject = v;
        }
        if let Some(v) = self.experience {
            t.experience = v;
        }
        if let Some(v) = self.salary {
            t.salary = v;
        }
        if let Some(v) = self.status {
            t.status = v;
        }
        if let Some(v) = self.join_date {
            t.join_date = v;
        }
        if let Some(v) = self.avatar {
            t.avatar = v;
        }
        if let Some(v) = self.department {
            t.department = v;
        }
        if let Some(v) = self.qualifications {
            t.qualifications = v;
        }
        if let Some(v) = self.address {
            t.address = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Salary,
    Bonus,
    Allowance,
    Overtime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub teacher_id: String,
    /// Copy of the teacher's name at write time; kept current by the rename cascade.
    pub teacher_name: String,
    #[serde(deserialize_with = "non_negative")]
    pub amount: f64,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPayment {
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(deserialize_with = "non_negative")]
    pub amount: f64,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewPayment {
    pub fn into_payment(self, id: String) -> Payment {
        Payment {
            id,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            amount: self.amount,
            date: self.date,
            status: self.status,
            payment_type: self.payment_type,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentPatch {
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
    #[serde(default, deserialize_with = "non_negative_opt")]
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    #[serde(default, deserialize_with = "serde_with::rust::double_option::deserialize")]
    pub description: Option<Option<String>>,
}

impl PaymentPatch {
    pub fn apply_to(self, p: &mut Payment) {
        if let Some(v) = self.teacher_id {
            p.teacher_id = v;
        }
        if let Some(v) = self.teacher_name {
            p.teacher_name = v;
        }
        if let Some(v) = self.amount {
            p.amount = v;
        }
        if let Some(v) = self.date {
            p.date = v;
        }
        if let Some(v) = self.status {
            p.status = v;
        }
        if let Some(v) = self.payment_type {
            p.payment_type = v;
        }
        if let Some(v) = self.description {
            p.description = v;
        }
    }
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if !v.is_finite() || v < 0.0 {
        return Err(D::Error::custom(format!(
            "expected a non-negative number, got {v}"
        )));
    }
    Ok(v)
}

fn non_negative_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(v) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !v.is_finite() || v < 0.0 {
        return Err(D::Error::custom(format!(
            "expected a non-negative number, got {v}"
        )));
    }
    Ok(Some(v))
}
