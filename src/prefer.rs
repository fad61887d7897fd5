use crate::candidate::Candidate;
use std::{cmp::Ordering, fmt::Debug, sync::Arc};

/// A comparator ordering candidates from least to most preferred position
pub type Comparator = Arc<dyn Fn(&Candidate, &Candidate) -> Ordering + Send + Sync>;

/// How the candidates of a listing should be ordered for selection
#[derive(Clone, Default)]
pub enum Prefer {
	/// Keep the order the forge listed them in
	#[default]
	Upstream,
	/// Leave ordering to the host's own ranking stage
	External,
	/// Sort with a custom comparator
	Custom(Comparator),
}

impl Prefer {
	/// Creates a policy sorting candidates with `compare`
	pub fn custom<F>(compare: F) -> Self
	where
		F: Fn(&Candidate, &Candidate) -> Ordering + Send + Sync + 'static,
	{
		Prefer::Custom(Arc::new(compare))
	}

	/// The ranker to install for this policy
	///
	/// `None` means the host ranks the candidates itself. When no preference was asked for, the
	/// identity ranker is installed so selection falls back to upstream order.
	#[must_use]
	pub fn ranker(&self) -> Option<Ranker> {
		match self {
			Prefer::Upstream => Some(Ranker::Identity),
			Prefer::External => None,
			Prefer::Custom(compare) => Some(Ranker::Custom(compare.clone())),
		}
	}
}

impl From<bool> for Prefer {
	fn from(prefer: bool) -> Self {
		if prefer {
			Prefer::External
		} else {
			Prefer::Upstream
		}
	}
}

impl Debug for Prefer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Prefer::Upstream => write!(f, "Upstream"),
			Prefer::External => write!(f, "External"),
			Prefer::Custom(_) => write!(f, "Custom(..)"),
		}
	}
}

/// A ranking applied to candidates before they reach selection
#[derive(Clone)]
pub enum Ranker {
	/// Returns candidates unchanged
	Identity,
	/// Stable sort with a comparator
	Custom(Comparator),
}

impl Ranker {
	/// Ranks the candidates
	#[must_use]
	pub fn rank(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
		match self {
			Ranker::Identity => candidates,
			Ranker::Custom(compare) => {
				candidates.sort_by(|a, b| compare(a, b));
				candidates
			}
		}
	}
}

impl Debug for Ranker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Ranker::Identity => write!(f, "Identity"),
			Ranker::Custom(_) => write!(f, "Custom(..)"),
		}
	}
}
