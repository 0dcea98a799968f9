//! Canned answers picked at random from the message store

use grandpy_core::MessageStore;
use rand::seq::SliceRandom;
use rand::Rng;

/// Used only when the error pool is empty
const FALLBACK_ERROR: &str = "Je ne connais pas cet endroit.";

/// Pick one message uniformly at random
pub fn pick<'a, R: Rng + ?Sized>(pool: &'a [String], rng: &mut R) -> Option<&'a str> {
    pool.choose(rng).map(String::as_str)
}

/// Address prefix followed by the formatted address
pub fn address_message<R: Rng + ?Sized>(
    store: &MessageStore,
    formatted_address: &str,
    rng: &mut R,
) -> String {
    match pick(&store.message_for_address, rng) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix} {formatted_address}"),
        _ => formatted_address.to_string(),
    }
}

pub fn error_message<R: Rng + ?Sized>(store: &MessageStore, rng: &mut R) -> String {
    pick(&store.message_for_error, rng)
        .unwrap_or(FALLBACK_ERROR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> MessageStore {
        MessageStore {
            message_for_address: vec!["La voici :".to_string()],
            message_for_story: vec![],
            message_for_error: vec!["Oups".to_string(), "Aucune idée".to_string()],
        }
    }

    #[test]
    fn test_pick_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick(&[], &mut rng), None);
    }

    #[test]
    fn test_pick_stays_in_pool() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let message = pick(&store.message_for_error, &mut rng).unwrap();
            assert!(store.message_for_error.iter().any(|m| m == message));
        }
    }

    #[test]
    fn test_address_message() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            address_message(&store(), "Champ de Mars, Paris", &mut rng),
            "La voici : Champ de Mars, Paris"
        );
    }

    #[test]
    fn test_address_message_without_prefixes() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = MessageStore {
            message_for_address: vec![],
            ..store()
        };
        assert_eq!(
            address_message(&store, "Champ de Mars, Paris", &mut rng),
            "Champ de Mars, Paris"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = MessageStore {
            message_for_error: vec![],
            ..store()
        };
        assert_eq!(error_message(&store, &mut rng), FALLBACK_ERROR);
    }
}
