use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ParticipantName = String;

/// Generates the opaque identifiers used for trips and expenses.
pub fn new_id() -> String {
    ObjectId::new().to_hex()
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub participants: Vec<ParticipantName>,
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payment made by one participant and shared equally among all of them.
///
/// The `id` is assigned once when the expense is recorded and survives edits,
/// so removing an expense never changes how the others are addressed.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: ParticipantName,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewTrip {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub participants: Vec<ParticipantName>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub paid_by: ParticipantName,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Accepts `12.5` as well as `"12.5"`. Anything unparsable, including `null`,
/// becomes NaN and is rejected by validation.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(amount)) => amount,
        Some(RawAmount::Text(text)) => text.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    };
    Ok(amount)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParticipantInput {
    #[serde(default)]
    pub name: ParticipantName,
}
