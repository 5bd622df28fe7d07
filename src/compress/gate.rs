use crate::model::Outcome;

/// Decision of the size gate for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Accepted(Vec<u8>),
    Rejected { candidate_len: usize },
}

/// Keep `candidate` only if it is non-empty and strictly smaller than `original`
pub fn size_gate(original: &[u8], candidate: Vec<u8>) -> Gate {
    if !candidate.is_empty() && candidate.len() < original.len() {
        Gate::Accepted(candidate)
    } else {
        Gate::Rejected {
            candidate_len: candidate.len(),
        }
    }
}

impl Gate {
    pub fn outcome(&self, original_len: usize) -> Outcome {
        match self {
            Gate::Accepted(bytes) => Outcome::Compressed {
                original_len,
                compressed_len: bytes.len(),
            },
            Gate::Rejected { candidate_len } => Outcome::Skipped {
                original_len,
                candidate_len: *candidate_len,
            },
        }
    }
}
