//! Deterministic per-agent RNG.
//!
//! Each agent owns an independent `SmallRng` seeded by
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! where the constant is the 64-bit fractional part of the golden ratio.
//! Agents never share RNG state, so combat rolls do not depend on the order
//! agents tick in, and spawning more agents does not disturb existing seeds.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG, owned by the agent it rolls for.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// `true` with probability `p` (clamped to [0, 1]).  NaN never
    /// succeeds.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Percentile roll in the half-open range (0, 100].
    ///
    /// Never returns 0, so `roll > 0.0` always holds.
    #[inline]
    pub fn roll_percent(&mut self) -> f32 {
        100.0 - self.0.gen_range(0.0f32..100.0)
    }

    /// Pick a side: `1.0` or `-1.0`.
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.0.r#gen::<bool>() { 1.0 } else { -1.0 }
    }
}
