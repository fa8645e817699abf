//! Validation of client input and the mutations applied to a [`Trip`].
//!
//! Everything that reaches the balance calculator goes through here first, so
//! a stored expense is always paid by a current participant.
use chrono::Utc;

use crate::error::ApiError;
use crate::schemas::{new_id, Expense, ExpenseInput, NewTrip, ParticipantName, Trip};

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

impl NewTrip {
    pub fn validate(self) -> Result<Trip, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("Trip name is required"));
        }
        if self.participants.is_empty() {
            return Err(invalid("At least one participant is required"));
        }

        let mut participants: Vec<ParticipantName> = Vec::new();
        for participant in self.participants.iter().map(|p| p.trim()) {
            if participant.is_empty() {
                continue;
            }
            if participants.iter().any(|p| p == participant) {
                return Err(ApiError::Validation(format!(
                    "Participant \"{participant}\" is listed twice"
                )));
            }
            participants.push(participant.to_string());
        }
        if participants.is_empty() {
            return Err(invalid("At least one valid participant is required"));
        }

        let now = Utc::now();
        Ok(Trip {
            id: new_id(),
            name: name.to_string(),
            participants,
            expenses: vec![],
            created_at: now,
            updated_at: now,
        })
    }
}

impl ExpenseInput {
    /// Builds an expense for `trip` under the given identifier.
    pub fn validate(self, trip: &Trip, id: String) -> Result<Expense, ApiError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(invalid("Expense description is required"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(invalid("Valid expense amount is required"));
        }
        let paid_by = self.paid_by.trim();
        if paid_by.is_empty() {
            return Err(invalid("Payer name is required"));
        }
        if !trip.is_participant(paid_by) {
            return Err(invalid("Payer must be a trip participant"));
        }

        Ok(Expense {
            id,
            description: description.to_string(),
            amount: self.amount,
            paid_by: paid_by.to_string(),
        })
    }
}

impl Trip {
    pub fn is_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    fn expense_position(&self, expense_id: &str) -> Result<usize, ApiError> {
        self.expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(ApiError::expense_not_found)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Records a new expense and returns a copy of it.
    pub fn add_expense(&mut self, input: ExpenseInput) -> Result<Expense, ApiError> {
        let expense = input.validate(self, new_id())?;
        self.expenses.push(expense.clone());
        self.touch();
        Ok(expense)
    }

    /// Replaces the content of an expense, keeping its identifier.
    pub fn update_expense(
        &mut self,
        expense_id: &str,
        input: ExpenseInput,
    ) -> Result<Expense, ApiError> {
        let position = self.expense_position(expense_id)?;
        let expense = input.validate(self, expense_id.to_string())?;
        self.expenses[position] = expense.clone();
        self.touch();
        Ok(expense)
    }

    pub fn remove_expense(&mut self, expense_id: &str) -> Result<Expense, ApiError> {
        let position = self.expense_position(expense_id)?;
        let removed = self.expenses.remove(position);
        self.touch();
        Ok(removed)
    }

    pub fn add_participant(&mut self, name: &str) -> Result<(), ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("Participant name cannot be empty"));
        }
        if self.is_participant(name) {
            return Err(ApiError::Conflict(format!(
                "\"{name}\" is already a trip participant"
            )));
        }
        self.participants.push(name.to_string());
        self.touch();
        Ok(())
    }

    /// Removes a participant who pays for none of the trip's expenses.
    pub fn remove_participant(&mut self, name: &str) -> Result<(), ApiError> {
        let name = name.trim();
        let position = self
            .participants
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| ApiError::NotFound("Participant not found".to_string()))?;
        if self.expenses.iter().any(|e| e.paid_by == name) {
            return Err(ApiError::Conflict(format!(
                "\"{name}\" paid for expenses of this trip"
            )));
        }
        if self.participants.len() == 1 {
            return Err(ApiError::Conflict(
                "A trip needs at least one participant".to_string(),
            ));
        }
        self.participants.remove(position);
        self.touch();
        Ok(())
    }
}
