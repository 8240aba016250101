use crate::domain::InteractionId;

pub const DEFAULT_PHONE_NUMBERS: [&str; 4] =
    ["1234567890", "2345678901", "3456789012", "4567890123"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedCall {
    pub id: InteractionId,
    pub number: String,
}

/// Stand-in for a channel API: hands out call ids and cycles through a fixed
/// list of dial strings for inbound calls.
#[derive(Debug, Clone)]
pub struct CallSimulator {
    phone_numbers: Vec<String>,
    next_index: usize,
}

impl Default for CallSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_PHONE_NUMBERS.iter().map(|n| n.to_string()).collect())
    }
}

impl CallSimulator {
    /// An empty list falls back to the defaults.
    pub fn new(phone_numbers: Vec<String>) -> Self {
        if phone_numbers.is_empty() {
            return Self::default();
        }
        Self {
            phone_numbers,
            next_index: 0,
        }
    }

    pub fn new_call(&mut self) -> SimulatedCall {
        SimulatedCall {
            id: InteractionId::generate(),
            number: self.next_phone_number(),
        }
    }

    pub fn new_outbound_call(&self, phone: &str) -> SimulatedCall {
        SimulatedCall {
            id: InteractionId::generate(),
            number: phone.to_string(),
        }
    }

    pub fn next_phone_number(&mut self) -> String {
        let result = self.phone_numbers[self.next_index].clone();
        self.next_index = (self.next_index + 1) % self.phone_numbers.len();
        result
    }

    pub fn peek_phone_number(&self) -> &str {
        &self.phone_numbers[self.next_index]
    }

    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }
}
