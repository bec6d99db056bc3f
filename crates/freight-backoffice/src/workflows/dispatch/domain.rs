use crate::store::{
    BrokerId, BrokerPatch, LoadPatch, LoadRecord, LoadStatus, NewBrokerRecord,
    NewDeliveryLoadRecord, NewLoadRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Admin form payload for a new broker.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBroker {
    pub name: String,
    pub email: String,
}

impl NewBroker {
    pub fn validate(self) -> Result<NewBrokerRecord, DispatchValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DispatchValidationError::EmptyField("name"));
        }
        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(DispatchValidationError::InvalidEmail(email));
        }
        Ok(NewBrokerRecord { name, email })
    }
}

/// Partial broker edit from the admin console.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl BrokerUpdate {
    pub fn validate(self) -> Result<BrokerPatch, DispatchValidationError> {
        let name = match self.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(DispatchValidationError::EmptyField("name"));
                }
                Some(name)
            }
            None => None,
        };
        let email = match self.email {
            Some(email) => {
                let email = email.trim().to_string();
                if !is_valid_email(&email) {
                    return Err(DispatchValidationError::InvalidEmail(email));
                }
                Some(email)
            }
            None => None,
        };
        Ok(BrokerPatch { name, email })
    }
}

/// Admin form payload for a new load. Status always starts `Dispatched`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoad {
    pub load_id_name: String,
    pub assigned_broker_id: BrokerId,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

impl NewLoad {
    pub fn validate(self) -> Result<NewLoadRecord, DispatchValidationError> {
        let load_id_name = self.load_id_name.trim().to_string();
        if load_id_name.is_empty() {
            return Err(DispatchValidationError::EmptyField("loadIdName"));
        }
        Ok(NewLoadRecord {
            load_id_name,
            assigned_broker_id: self.assigned_broker_id,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            status: LoadStatus::Dispatched,
        })
    }
}

/// Partial load edit from the admin console.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadUpdate {
    #[serde(default)]
    pub load_id_name: Option<String>,
    #[serde(default)]
    pub assigned_broker_id: Option<BrokerId>,
    #[serde(default)]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<LoadStatus>,
}

impl LoadUpdate {
    pub fn validate(self) -> Result<LoadPatch, DispatchValidationError> {
        let load_id_name = match self.load_id_name {
            Some(label) => {
                let label = label.trim().to_string();
                if label.is_empty() {
                    return Err(DispatchValidationError::EmptyField("loadIdName"));
                }
                Some(label)
            }
            None => None,
        };
        Ok(LoadPatch {
            load_id_name,
            assigned_broker_id: self.assigned_broker_id,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            status: self.status,
        })
    }
}

/// Admin form payload for the delivery-tracking view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeliveryLoad {
    pub broker_name: String,
    pub pickup_date: NaiveDate,
    pub pickup_state: String,
    pub delivery_state: String,
    pub total_miles: u32,
}

impl NewDeliveryLoad {
    pub fn validate(self) -> Result<NewDeliveryLoadRecord, DispatchValidationError> {
        let broker_name = self.broker_name.trim().to_string();
        if broker_name.is_empty() {
            return Err(DispatchValidationError::EmptyField("brokerName"));
        }
        let pickup_state = self.pickup_state.trim().to_string();
        if pickup_state.is_empty() {
            return Err(DispatchValidationError::EmptyField("pickupState"));
        }
        let delivery_state = self.delivery_state.trim().to_string();
        if delivery_state.is_empty() {
            return Err(DispatchValidationError::EmptyField("deliveryState"));
        }
        Ok(NewDeliveryLoadRecord {
            broker_name,
            pickup_date: self.pickup_date,
            pickup_state,
            delivery_state,
            total_miles: self.total_miles,
        })
    }
}

/// Loads table row: load joined with the assigned broker's name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadView {
    #[serde(flatten)]
    pub load: LoadRecord,
    pub broker_name: Option<String>,
}

/// Field-level rejection surfaced inline in the admin console.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Minimal shape check matching the admin form's email pattern: one `@`
/// with non-empty sides and no whitespace.
fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !value.chars().any(|c| c.is_whitespace())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_requires_name_and_well_formed_email() {
        let ok = NewBroker {
            name: "Acme".to_string(),
            email: "a@acme.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank_name = NewBroker {
            name: "  ".to_string(),
            email: "a@acme.com".to_string(),
        };
        assert_eq!(
            blank_name.validate().unwrap_err(),
            DispatchValidationError::EmptyField("name")
        );

        for bad in ["not-an-email", "@acme.com", "a@", "a b@acme.com", "a@b@c"] {
            let broker = NewBroker {
                name: "Acme".to_string(),
                email: bad.to_string(),
            };
            assert!(
                matches!(
                    broker.validate(),
                    Err(DispatchValidationError::InvalidEmail(_))
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn load_requires_a_label() {
        let bad = NewLoad {
            load_id_name: "".to_string(),
            assigned_broker_id: BrokerId("b-1".to_string()),
            pickup_date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
            delivery_date: NaiveDate::from_ymd_opt(2026, 1, 7).expect("valid date"),
        };
        assert_eq!(
            bad.validate().unwrap_err(),
            DispatchValidationError::EmptyField("loadIdName")
        );
    }

    #[test]
    fn new_load_always_starts_dispatched() {
        let load = NewLoad {
            load_id_name: "L-1".to_string(),
            assigned_broker_id: BrokerId("b-1".to_string()),
            pickup_date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
            delivery_date: NaiveDate::from_ymd_opt(2026, 1, 7).expect("valid date"),
        };
        let record = load.validate().expect("valid load");
        assert_eq!(record.status, LoadStatus::Dispatched);
    }
}
