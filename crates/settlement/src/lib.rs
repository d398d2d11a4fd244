//! Verified settlement layer: commit-reveal games against a trusted ledger.
//!
//! The simulation can run matches in two modes. Offline rounds apply the
//! payoff function directly. Verified rounds drive the full protocol
//! against the [`LedgerContract`] oracle, which enforces that neither side
//! can choose its move after seeing the opponent's:
//!
//! ```text
//! create -> join -> commit x2 -> reveal x2 -> settle
//! ```
//!
//! Commitments are salted blake3 digests of the move. The oracle stores
//! only the digest at commit time and recomputes it at reveal time, so a
//! party that changes its mind after seeing the counterparty's reveal is
//! rejected. A stalled game resolves through [`LedgerContract::claim_timeout`].
//!
//! The oracle is a single trusted component with a logical tick clock, not
//! a consensus system. Balances live behind the [`BalanceOracle`] trait so
//! the same ledger code serves the simulation and the tests.

pub mod digest;
pub mod error;
pub mod game;
pub mod ledger;
pub mod oracle;
pub mod payoff;

pub use digest::{commitment_digest, digest_hex, random_salt, Digest, SALT_BYTES};
pub use error::SettlementError;
pub use game::{Game, GamePhase, PartySlot};
pub use ledger::{LedgerContract, SettlementEvent, TxRef};
pub use oracle::{BalanceOracle, MemoryBalances};
pub use payoff::payoffs;
