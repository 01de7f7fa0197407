//! Form payloads and their validation rules. Each form deserializes from an
//! urlencoded POST body and validates into a typed value, collecting
//! per-field error messages for re-rendering on failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::database::models::Category;

const REQUIRED: &str = "This field is required.";

/// Per-field validation messages, keyed by field name. Every field of the
/// form is present in the map even when clean, so templates can index into
/// it unconditionally.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn for_fields(fields: &[&str]) -> Self {
        let mut map = BTreeMap::new();
        for field in fields {
            map.insert((*field).to_string(), Vec::new());
        }
        Self(map)
    }

    fn push(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_default().push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|messages| messages.is_empty())
    }

    #[cfg(test)]
    fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/*=============================Registration=============================*/

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct RegisterData {
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    pub fn empty_errors() -> FormErrors {
        FormErrors::for_fields(&["username", "password", "confirm_password"])
    }

    pub fn validate(&self) -> Result<RegisterData, FormErrors> {
        let mut errors = Self::empty_errors();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push("username", REQUIRED);
        } else if username.chars().count() < 3 {
            errors.push("username", "Field must be at least 3 characters long.");
        }

        if self.password.is_empty() {
            errors.push("password", REQUIRED);
        } else if self.password.chars().count() < 6 {
            errors.push("password", "Field must be at least 6 characters long.");
        }

        if self.confirm_password != self.password {
            errors.push("confirm_password", "Field must be equal to password.");
        }

        if errors.is_empty() {
            Ok(RegisterData {
                username: username.to_string(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/*=============================Login=============================*/

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn empty_errors() -> FormErrors {
        FormErrors::for_fields(&["username", "password"])
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = Self::empty_errors();

        if self.username.trim().is_empty() {
            errors.push("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.push("password", REQUIRED);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/*=============================Expenses=============================*/

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: String,
}

#[derive(Debug)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category_id: i64,
}

impl ExpenseForm {
    pub fn empty_errors() -> FormErrors {
        FormErrors::for_fields(&["description", "amount", "category"])
    }

    pub fn validate(&self, categories: &[Category]) -> Result<NewExpense, FormErrors> {
        let mut errors = Self::empty_errors();

        if self.description.trim().is_empty() {
            errors.push("description", REQUIRED);
        }

        let amount = validate_amount(&self.amount, &mut errors);

        let category_id = if self.category.trim().is_empty() {
            errors.push("category", REQUIRED);
            None
        } else {
            match self.category.trim().parse::<i64>() {
                Ok(id) if categories.iter().any(|c| c.id == id) => Some(id),
                _ => {
                    errors.push("category", "Not a valid choice.");
                    None
                }
            }
        };

        match (errors.is_empty(), amount, category_id) {
            (true, Some(amount), Some(category_id)) => Ok(NewExpense {
                description: self.description.clone(),
                amount,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

/*=============================Budget=============================*/

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BudgetForm {
    pub amount: String,
}

impl BudgetForm {
    pub fn empty_errors() -> FormErrors {
        FormErrors::for_fields(&["amount"])
    }

    pub fn validate(&self) -> Result<f64, FormErrors> {
        let mut errors = Self::empty_errors();
        match validate_amount(&self.amount, &mut errors) {
            Some(amount) if errors.is_empty() => Ok(amount),
            _ => Err(errors),
        }
    }
}

// Shared rule for money fields: a float no smaller than 1.
fn validate_amount(raw: &str, errors: &mut FormErrors) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push("amount", REQUIRED);
        return None;
    }
    let Ok(amount) = raw.parse::<f64>() else {
        errors.push("amount", "Not a valid float value.");
        return None;
    };
    // Written this way so NaN also lands in the error branch.
    if !(amount >= 1.0) {
        errors.push("amount", "Number must be at least 1.");
        return None;
    }
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category { id: 1, name: "Food".to_string() },
            Category { id: 2, name: "Travel".to_string() },
        ]
    }

    #[test]
    fn register_accepts_a_valid_form() {
        let form = RegisterForm {
            username: "  alice  ".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
        };
        let data = form.validate().unwrap();
        assert_eq!(data.username, "alice");
        assert_eq!(data.password, "secret123");
    }

    #[test]
    fn register_rejects_short_username_and_mismatched_passwords() {
        let form = RegisterForm {
            username: "al".to_string(),
            password: "secret123".to_string(),
            confirm_password: "different".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("username"), ["Field must be at least 3 characters long."]);
        assert_eq!(errors.field("confirm_password"), ["Field must be equal to password."]);
    }

    #[test]
    fn register_rejects_short_password() {
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("password"), ["Field must be at least 6 characters long."]);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.field("username"), [REQUIRED]);
        assert_eq!(errors.field("password"), [REQUIRED]);
    }

    #[test]
    fn expense_accepts_a_valid_form() {
        let form = ExpenseForm {
            description: "Lunch".to_string(),
            amount: "12.50".to_string(),
            category: "1".to_string(),
        };
        let expense = form.validate(&categories()).unwrap();
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category_id, 1);
    }

    #[test]
    fn expense_rejects_zero_and_negative_amounts() {
        for raw in ["0", "-5"] {
            let form = ExpenseForm {
                description: "Lunch".to_string(),
                amount: raw.to_string(),
                category: "1".to_string(),
            };
            let errors = form.validate(&categories()).unwrap_err();
            assert_eq!(errors.field("amount"), ["Number must be at least 1."]);
        }
    }

    #[test]
    fn expense_rejects_non_numeric_amount() {
        let form = ExpenseForm {
            description: "Lunch".to_string(),
            amount: "abc".to_string(),
            category: "1".to_string(),
        };
        let errors = form.validate(&categories()).unwrap_err();
        assert_eq!(errors.field("amount"), ["Not a valid float value."]);
    }

    #[test]
    fn expense_rejects_a_category_outside_the_known_set() {
        let form = ExpenseForm {
            description: "Lunch".to_string(),
            amount: "12".to_string(),
            category: "99".to_string(),
        };
        let errors = form.validate(&categories()).unwrap_err();
        assert_eq!(errors.field("category"), ["Not a valid choice."]);
    }

    #[test]
    fn budget_validates_like_a_money_field() {
        assert_eq!(BudgetForm { amount: "500".to_string() }.validate().unwrap(), 500.0);
        let errors = BudgetForm { amount: "0.5".to_string() }.validate().unwrap_err();
        assert_eq!(errors.field("amount"), ["Number must be at least 1."]);
    }
}
