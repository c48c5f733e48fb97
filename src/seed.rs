//! Records a fresh workspace starts with.

use chrono::NaiveDate;

use crate::model::{Address, Payment, PaymentStatus, PaymentType, Teacher, TeacherStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn springfield(street: &str, zip_code: &str) -> Address {
    Address {
        street: street.to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: zip_code.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn teacher(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    subject: &str,
    experience: u32,
    salary: f64,
    status: TeacherStatus,
    join_date: NaiveDate,
    department: &str,
    qualifications: &[&str],
    address: Address,
) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        subject: subject.to_string(),
        experience,
        salary,
        status,
        join_date,
        avatar: None,
        department: department.to_string(),
        qualifications: qualifications.iter().map(|q| q.to_string()).collect(),
        address,
    }
}

pub fn teachers() -> Vec<Teacher> {
    vec![
        teacher(
            "1",
            "Sarah Johnson",
            "sarah.j@school.edu",
            "+1 234 567 8901",
            "Mathematics",
            8,
            65000.0,
            TeacherStatus::Active,
            date(2024, 1, 15),
            "Science",
            &["M.Sc Mathematics", "B.Ed"],
            springfield("123 Main St", "62701"),
        ),
        teacher(
            "2",
            "Michael Chen",
            "michael.c@school.edu",
            "+1 234 567 8902",
            "Physics",
            12,
            72000.0,
            TeacherStatus::Active,
            date(2024, 1, 10),
            "Science",
            &["Ph.D Physics", "M.Sc Physics"],
            springfield("456 Oak Ave", "62702"),
        ),
        teacher(
            "3",
            "Emily Rodriguez",
            "emily.r@school.edu",
            "+1 234 567 8903",
            "English Literature",
            6,
            58000.0,
            TeacherStatus::OnLeave,
            date(2023, 8, 20),
            "Arts",
            &["M.A English", "B.Ed"],
            springfield("789 Pine St", "62703"),
        ),
        teacher(
            "4",
            "David Wilson",
            "david.w@school.edu",
            "+1 234 567 8904",
            "History",
            15,
            78000.0,
            TeacherStatus::Active,
            date(2022, 3, 12),
            "Social Studies",
            &["M.A History", "Ph.D History"],
            springfield("321 Elm St", "62704"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn payment(
    id: &str,
    teacher_id: &str,
    teacher_name: &str,
    amount: f64,
    on: NaiveDate,
    status: PaymentStatus,
    payment_type: PaymentType,
    description: &str,
) -> Payment {
    Payment {
        id: id.to_string(),
        teacher_id: teacher_id.to_string(),
        teacher_name: teacher_name.to_string(),
        amount,
        date: on,
        status,
        payment_type,
        description: Some(description.to_string()),
    }
}

pub fn payments() -> Vec<Payment> {
    vec![
        payment(
            "1",
            "1",
            "Sarah Johnson",
            5416.67,
            date(2024, 1, 31),
            PaymentStatus::Paid,
            PaymentType::Salary,
            "January 2024 Salary",
        ),
        payment(
            "2",
            "2",
            "Michael Chen",
            6000.0,
            date(2024, 1, 31),
            PaymentStatus::Paid,
            PaymentType::Salary,
            "January 2024 Salary",
        ),
        payment(
            "3",
            "3",
            "Emily Rodriguez",
            4833.33,
            date(2024, 2, 15),
            PaymentStatus::Pending,
            PaymentType::Salary,
            "February 2024 Salary",
        ),
        payment(
            "4",
            "1",
            "Sarah Johnson",
            1000.0,
            date(2024, 2, 10),
            PaymentStatus::Overdue,
            PaymentType::Bonus,
            "Performance Bonus Q1",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_payments_match_seed_teacher_names() {
        let teachers = teachers();
        for p in payments() {
            let t = teachers
                .iter()
                .find(|t| t.id == p.teacher_id)
                .expect("seed payment references a seed teacher");
            assert_eq!(t.name, p.teacher_name);
        }
    }

    #[test]
    fn seed_dates_are_real() {
        assert_eq!(teachers()[3].join_date.to_string(), "2022-03-12");
        assert_eq!(payments()[2].date.to_string(), "2024-02-15");
    }
}
