//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::{Cassette, Interaction};

/// Hands out a cassette's interactions one at a time, per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Index a loaded cassette by port and method, keeping sequence order.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut interactions = cassette.interactions;
        interactions.sort_by_key(|i| i.seq);

        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Take the next recorded output for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns an error once the recordings for that pair are used up.
    pub fn next_output(&mut self, port: &str, method: &str) -> Result<serde_json::Value, String> {
        self.queues
            .get_mut(&(port.to_string(), method.to_string()))
            .and_then(VecDeque::pop_front)
            .map(|interaction| interaction.output)
            .ok_or_else(|| format!("Cassette exhausted for {port}::{method}"))
    }

    /// Interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, prompt: &str) -> Interaction {
        Interaction {
            seq,
            port: "image_generator".into(),
            method: "generate".into(),
            input: json!({ "prompt": prompt }),
            output: json!({ "Ok": { "images": [] }, "seq": seq }),
        }
    }

    #[test]
    fn serves_in_sequence_order() {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![interaction(1, "second"), interaction(0, "first")],
        };
        let mut replayer = CassetteReplayer::new(cassette);
        assert_eq!(replayer.remaining(), 2);

        let first = replayer.next_output("image_generator", "generate").unwrap();
        assert_eq!(first["seq"], 0);
        let second = replayer.next_output("image_generator", "generate").unwrap();
        assert_eq!(second["seq"], 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhaustion_is_an_error() {
        let cassette =
            Cassette { name: "t".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions: vec![] };
        let mut replayer = CassetteReplayer::new(cassette);
        let err = replayer.next_output("image_generator", "generate").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }
}
