use sha2::{Digest, Sha256};

use crate::models::BookingFields;

/// Issues the immutable transaction identifier for a committed booking.
pub trait TransactionLedger: Send + Sync {
    fn generate_transaction_id(&self, fields: &BookingFields) -> String;
}

/// Local stand-in for a chain write: SHA-256 over the booking JSON salted
/// with the current wall-clock time, rendered like an Ethereum tx hash.
pub struct HashLedger;

impl TransactionLedger for HashLedger {
    fn generate_transaction_id(&self, fields: &BookingFields) -> String {
        let salt = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();
        let payload = serde_json::json!({
            "booking": fields,
            "_timestamp": salt,
        });

        let digest = Sha256::digest(payload.to_string().as_bytes());
        format!("0x{digest:x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    fn fields() -> BookingFields {
        BookingFields {
            pet_name: "Coco".to_string(),
            species: "Dog (Aspin)".to_string(),
            service: "Vaccination".to_string(),
            datetime: "03/20/2026 10:00 AM".to_string(),
            status: BookingStatus::Pending,
            assigned_vet: "Pending assignment".to_string(),
        }
    }

    #[test]
    fn test_hash_shape() {
        let id = HashLedger.generate_transaction_id(&fields());
        assert_eq!(id.len(), 66);
        assert!(id.starts_with("0x"));
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_identical_bookings_get_distinct_ids() {
        let a = HashLedger.generate_transaction_id(&fields());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = HashLedger.generate_transaction_id(&fields());
        assert_ne!(a, b);
    }
}
