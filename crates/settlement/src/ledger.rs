//! Ledger Contract
//!
//! The trusted settlement oracle. Holds every game, assigns transaction
//! references with per-identity sequence numbers, runs a logical tick
//! clock for timeouts, and emits events for observers.
//!
//! The oracle is the currency issuer: cooperative surplus (payouts above
//! the escrowed stakes) is credited directly through the balance oracle,
//! the same way the offline path applies the payoff table.

use std::collections::HashMap;

use crate::digest::{commitment_digest, Digest};
use crate::error::SettlementError;
use crate::game::{Game, GamePhase};
use crate::oracle::BalanceOracle;
use crate::payoff::payoffs;

/// Default timeout window in oracle clock ticks.
pub const DEFAULT_TIMEOUT_TICKS: u64 = 50;

/// Reference to an accepted oracle call.
///
/// Nonces increase monotonically per signing identity; a later call for
/// the same identity always carries a higher nonce than an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRef {
    pub tx_id: String,
    pub nonce: u64,
}

/// Events emitted by the oracle, in emission order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SettlementEvent {
    GameCreated {
        game_id: u64,
        agent1: String,
        agent2: String,
        stake1: f64,
        stake2: f64,
    },
    MoveCommitted {
        game_id: u64,
        agent: String,
    },
    MoveRevealed {
        game_id: u64,
        agent: String,
        cooperate: bool,
    },
    GameSettled {
        game_id: u64,
        agent1_cooperated: bool,
        agent2_cooperated: bool,
        payout1: f64,
        payout2: f64,
    },
    TimeoutClaimed {
        game_id: u64,
        claimant: String,
        amount: f64,
    },
}

/// The trusted settlement oracle.
#[derive(Debug)]
pub struct LedgerContract {
    games: HashMap<u64, Game>,
    game_counter: u64,
    tx_counter: u64,
    /// Next sequence number per signing identity
    nonces: HashMap<String, u64>,
    events: Vec<SettlementEvent>,
    /// Logical clock, advanced by the orchestrator
    now: u64,
    timeout_ticks: u64,
}

impl LedgerContract {
    pub fn new(timeout_ticks: u64) -> Self {
        Self {
            games: HashMap::new(),
            game_counter: 0,
            tx_counter: 0,
            nonces: HashMap::new(),
            events: Vec::new(),
            now: 0,
            timeout_ticks,
        }
    }

    /// Advance the logical clock. The clock never moves backwards.
    pub fn advance_to(&mut self, tick: u64) {
        self.now = self.now.max(tick);
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn timeout_ticks(&self) -> u64 {
        self.timeout_ticks
    }

    /// Number of games not yet in a terminal phase.
    pub fn open_game_count(&self) -> usize {
        self.games.values().filter(|g| !g.phase.is_terminal()).count()
    }

    /// Assign the next transaction reference for a signer.
    fn next_tx(&mut self, identity: &str) -> TxRef {
        let nonce = self.nonces.entry(identity.to_string()).or_insert(0);
        let assigned = *nonce;
        *nonce += 1;
        self.tx_counter += 1;
        TxRef {
            tx_id: format!("tx_{:08}", self.tx_counter),
            nonce: assigned,
        }
    }

    fn game_mut(&mut self, game_id: u64) -> Result<&mut Game, SettlementError> {
        self.games
            .get_mut(&game_id)
            .ok_or(SettlementError::GameNotFound { game_id })
    }

    /// Create a game and escrow the creator's stake.
    pub fn create_game(
        &mut self,
        oracle: &mut dyn BalanceOracle,
        creator: &str,
        counterparty: &str,
        stake: f64,
    ) -> Result<(u64, TxRef), SettlementError> {
        if stake <= 0.0 {
            return Err(SettlementError::NonPositiveStake { stake });
        }
        oracle.debit(creator, stake)?;

        self.game_counter += 1;
        let game_id = self.game_counter;
        let mut game = Game::new(game_id, creator, counterparty, self.now);
        game.creator.stake = stake;
        self.games.insert(game_id, game);

        // The counterparty's stake is still zero at creation time
        self.events.push(SettlementEvent::GameCreated {
            game_id,
            agent1: creator.to_string(),
            agent2: counterparty.to_string(),
            stake1: stake,
            stake2: 0.0,
        });
        tracing::debug!(game_id, creator, counterparty, stake, "game created");

        Ok((game_id, self.next_tx(creator)))
    }

    /// Counterparty joins the game with its own stake.
    pub fn join_game(
        &mut self,
        oracle: &mut dyn BalanceOracle,
        game_id: u64,
        joiner: &str,
        stake: f64,
    ) -> Result<TxRef, SettlementError> {
        if stake <= 0.0 {
            return Err(SettlementError::NonPositiveStake { stake });
        }
        let game = self.game_mut(game_id)?;
        if game.phase != GamePhase::AwaitingJoin {
            return Err(SettlementError::WrongPhase {
                game_id,
                phase: game.phase,
                expected: "awaiting_join",
            });
        }
        if game.counterparty.identity != joiner {
            return Err(SettlementError::NotAParticipant {
                game_id,
                identity: joiner.to_string(),
            });
        }
        oracle.debit(joiner, stake)?;
        let game = self.game_mut(game_id)?;
        game.counterparty.stake = stake;
        game.phase = GamePhase::AwaitingCommits;

        Ok(self.next_tx(joiner))
    }

    /// Store a party's binding commitment digest.
    pub fn commit_move(
        &mut self,
        game_id: u64,
        identity: &str,
        digest: Digest,
    ) -> Result<TxRef, SettlementError> {
        let game = self.game_mut(game_id)?;
        if game.phase != GamePhase::AwaitingCommits {
            return Err(SettlementError::WrongPhase {
                game_id,
                phase: game.phase,
                expected: "awaiting_commits",
            });
        }
        let Some(slot) = game.party_mut(identity) else {
            return Err(SettlementError::NotAParticipant {
                game_id,
                identity: identity.to_string(),
            });
        };
        if slot.commitment.is_some() {
            return Err(SettlementError::AlreadyCommitted {
                game_id,
                identity: identity.to_string(),
            });
        }
        slot.commitment = Some(digest);
        if game.both_committed() {
            game.phase = GamePhase::AwaitingReveals;
        }

        self.events.push(SettlementEvent::MoveCommitted {
            game_id,
            agent: identity.to_string(),
        });

        Ok(self.next_tx(identity))
    }

    /// Reveal a party's move.
    ///
    /// The reveal is accepted only if the recomputed digest matches the
    /// stored commitment, and only once per party. When the second reveal
    /// lands, the game settles immediately: payouts are computed from the
    /// revealed moves and credited through the balance oracle.
    pub fn reveal_move(
        &mut self,
        oracle: &mut dyn BalanceOracle,
        game_id: u64,
        identity: &str,
        cooperate: bool,
        salt: &str,
    ) -> Result<TxRef, SettlementError> {
        let game = self.game_mut(game_id)?;
        if game.phase != GamePhase::AwaitingReveals {
            return Err(SettlementError::WrongPhase {
                game_id,
                phase: game.phase,
                expected: "awaiting_reveals",
            });
        }
        let Some(slot) = game.party_mut(identity) else {
            return Err(SettlementError::NotAParticipant {
                game_id,
                identity: identity.to_string(),
            });
        };
        if slot.revealed.is_some() {
            return Err(SettlementError::AlreadyRevealed {
                game_id,
                identity: identity.to_string(),
            });
        }
        // Commitment is always present in AwaitingReveals
        if slot.commitment != Some(commitment_digest(cooperate, salt)) {
            return Err(SettlementError::CommitmentMismatch {
                game_id,
                identity: identity.to_string(),
            });
        }
        slot.revealed = Some(cooperate);

        self.events.push(SettlementEvent::MoveRevealed {
            game_id,
            agent: identity.to_string(),
            cooperate,
        });

        if self.games.get(&game_id).is_some_and(Game::both_revealed) {
            self.settle(oracle, game_id)?;
        }

        Ok(self.next_tx(identity))
    }

    /// Release payouts once both reveals are in.
    fn settle(
        &mut self,
        oracle: &mut dyn BalanceOracle,
        game_id: u64,
    ) -> Result<(), SettlementError> {
        let game = self.game_mut(game_id)?;
        let (Some(cooperate1), Some(cooperate2)) =
            (game.creator.revealed, game.counterparty.revealed)
        else {
            return Ok(());
        };

        let (payout1, payout2) = payoffs(
            cooperate1,
            cooperate2,
            game.creator.stake,
            game.counterparty.stake,
        );
        game.payouts = Some((payout1, payout2));
        game.phase = GamePhase::Settled;
        let agent1 = game.creator.identity.clone();
        let agent2 = game.counterparty.identity.clone();

        oracle.credit(&agent1, payout1);
        oracle.credit(&agent2, payout2);

        self.events.push(SettlementEvent::GameSettled {
            game_id,
            agent1_cooperated: cooperate1,
            agent2_cooperated: cooperate2,
            payout1,
            payout2,
        });
        tracing::debug!(game_id, payout1, payout2, "game settled");

        Ok(())
    }

    /// Resolve a stalled game after the timeout window.
    ///
    /// The silent party is treated as having defaulted: the claimant
    /// receives every escrowed credit. Before the counterparty has joined
    /// only the creator can claim, and gets its own stake back.
    pub fn claim_timeout(
        &mut self,
        oracle: &mut dyn BalanceOracle,
        game_id: u64,
        claimant: &str,
    ) -> Result<TxRef, SettlementError> {
        let now = self.now;
        let timeout_ticks = self.timeout_ticks;
        let game = self.game_mut(game_id)?;
        if game.phase.is_terminal() {
            return Err(SettlementError::WrongPhase {
                game_id,
                phase: game.phase,
                expected: "an unsettled phase",
            });
        }
        if !game.is_participant(claimant) {
            return Err(SettlementError::NotAParticipant {
                game_id,
                identity: claimant.to_string(),
            });
        }
        if now < game.created_at + timeout_ticks {
            return Err(SettlementError::TimeoutNotElapsed { game_id });
        }
        if game.phase == GamePhase::AwaitingJoin && game.creator.identity != claimant {
            return Err(SettlementError::JoinPending { game_id });
        }

        let amount = game.escrowed();
        game.phase = GamePhase::TimedOut;
        oracle.credit(claimant, amount);

        self.events.push(SettlementEvent::TimeoutClaimed {
            game_id,
            claimant: claimant.to_string(),
            amount,
        });
        tracing::debug!(game_id, claimant, amount, "timeout claimed");

        Ok(self.next_tx(claimant))
    }

    /// Full game state, including revealed moves and the settled flag.
    pub fn get_game(&self, game_id: u64) -> Result<&Game, SettlementError> {
        self.games
            .get(&game_id)
            .ok_or(SettlementError::GameNotFound { game_id })
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SettlementEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for LedgerContract {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_TICKS)
    }
}
