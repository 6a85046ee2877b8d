//! The per-round attack scan.
//!
//! Evaluation is parallel and pure; application is serial and is the only
//! writer. Per-attempt randomness derives from `(seed, attacker, target)`,
//! so a rayon schedule change can never change an outcome.

use crate::attacker::{Attacker, AttackerRegistry};
use qs_02_mempool::Mempool;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use shared_types::{
    digest, Amount, AttackMetadata, ChainClock, OutputSpec, SimTime, Transaction, TxId, TxInput,
    TxKind, TxStatus,
};
use std::collections::BTreeSet;

/// A settled successful attack, for driver narration.
#[derive(Clone, Debug)]
pub struct AttackSuccess {
    /// Attacker that claimed the slot.
    pub attacker: String,
    /// The transaction whose inputs are being double-spent.
    pub victim: TxId,
    /// The injected competing transaction.
    pub competing: TxId,
    /// Fee the competing transaction bids.
    pub attack_fee: Amount,
    /// Value the attacker stands to steal.
    pub value: Amount,
}

/// Outcome tally of one scan.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    /// Attempts that were applied (failures + successes).
    pub attempts: usize,
    /// Attempts that were too slow or decohered.
    pub failures: usize,
    /// Applied successful attacks, in claim order.
    pub successes: Vec<AttackSuccess>,
}

/// Read-only view of one eligible target, captured before evaluation.
#[derive(Clone, Debug)]
struct TargetRow {
    txid: TxId,
    fee: Amount,
    total_input_value: Amount,
    key_count: usize,
    broadcast_time: SimTime,
    inputs: Vec<TxInput>,
}

/// Per-attempt verdict.
#[derive(Clone, Debug)]
enum Verdict {
    /// The block window closes before key derivation would finish.
    TooSlow { attack_time: f64, remaining: f64 },
    /// Derivation finished but the measurement decohered.
    Decohered,
    /// Keys derived; a competing spend is ready for injection.
    Success {
        competing: Box<Transaction>,
        meta: AttackMetadata,
    },
}

#[derive(Clone, Debug)]
struct Attempt {
    attacker: String,
    target: TxId,
    verdict: Verdict,
}

/// The attack engine. Stateless apart from the scan seed.
#[derive(Clone, Debug)]
pub struct AttackEngine {
    seed: u64,
}

impl AttackEngine {
    /// Creates an engine whose scans draw from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Runs every attacker against every eligible pool transaction.
    ///
    /// Eligible: status `Broadcast`, wallet-built (synthetic attack spends
    /// are not targets). Evaluation fans out per attacker; outcomes are
    /// applied in registration order, and an outcome against a target
    /// already claimed in this scan is dropped entirely, exactly what a
    /// serial attacker-by-attacker scan would have produced.
    #[tracing::instrument(skip_all, fields(attackers = attackers.len(), pool = pool.len()))]
    pub fn run_scan(
        &self,
        pool: &mut Mempool,
        attackers: &mut AttackerRegistry,
        clock: &ChainClock,
    ) -> ScanReport {
        let snapshot: Vec<TargetRow> = pool
            .iter()
            .filter(|tx| tx.status == TxStatus::Broadcast && tx.kind == TxKind::Regular)
            .map(|tx| TargetRow {
                txid: tx.txid,
                fee: tx.fee,
                total_input_value: tx.total_input_value(),
                key_count: tx.exposed_keys().len(),
                broadcast_time: tx.broadcast_time,
                inputs: tx.inputs.clone(),
            })
            .collect();

        if snapshot.is_empty() || attackers.is_empty() {
            return ScanReport::default();
        }

        // Parallel, read-only evaluation. Collect preserves registration
        // order, which the application pass depends on.
        let roster: Vec<&Attacker> = attackers.iter().collect();
        let evaluations: Vec<Vec<Attempt>> = roster
            .par_iter()
            .map(|attacker| self.evaluate(attacker, &snapshot, clock))
            .collect();

        // Serial application: the single writer.
        let mut report = ScanReport::default();
        let mut claimed: BTreeSet<TxId> = BTreeSet::new();

        for attempts in evaluations {
            for attempt in attempts {
                if claimed.contains(&attempt.target) {
                    // The serial-equivalent attacker would have skipped an
                    // already-attacked transaction: no counter moves.
                    continue;
                }
                match attempt.verdict {
                    Verdict::TooSlow {
                        attack_time,
                        remaining,
                    } => {
                        tracing::debug!(
                            attacker = %attempt.attacker,
                            target = %attempt.target.short(),
                            attack_time,
                            remaining,
                            "attack too slow: block will be mined first"
                        );
                        self.record_failure(attackers, &attempt.attacker, &mut report);
                    }
                    Verdict::Decohered => {
                        tracing::debug!(
                            attacker = %attempt.attacker,
                            target = %attempt.target.short(),
                            "attack failed: quantum decoherence"
                        );
                        self.record_failure(attackers, &attempt.attacker, &mut report);
                    }
                    Verdict::Success { competing, meta } => {
                        let victim = pool
                            .get_mut(&attempt.target)
                            .expect("snapshot rows come from the pool");
                        victim
                            .mark_attacked(meta.clone())
                            .expect("claim set guards the attack slot");
                        claimed.insert(attempt.target);

                        tracing::info!(
                            attacker = %attempt.attacker,
                            victim = %attempt.target.short(),
                            competing = %meta.competing_txid.short(),
                            attack_fee = meta.attack_fee,
                            value = meta.value,
                            "competing double-spend injected"
                        );

                        pool.admit(*competing)
                            .expect("competing txid derives fresh from victim and attacker");

                        report.attempts += 1;
                        report.successes.push(AttackSuccess {
                            attacker: attempt.attacker,
                            victim: attempt.target,
                            competing: meta.competing_txid,
                            attack_fee: meta.attack_fee,
                            value: meta.value,
                        });
                    }
                }
            }
        }

        report
    }

    fn record_failure(&self, attackers: &mut AttackerRegistry, name: &str, report: &mut ScanReport) {
        if let Some(attacker) = attackers.get_mut(name) {
            attacker.failed_attacks += 1;
        }
        report.attempts += 1;
        report.failures += 1;
    }

    /// One attacker's pass over the snapshot. Pure: mutates nothing,
    /// draws only from per-attempt derived generators.
    fn evaluate(
        &self,
        attacker: &Attacker,
        snapshot: &[TargetRow],
        clock: &ChainClock,
    ) -> Vec<Attempt> {
        let mut attempts = Vec::new();

        for target in snapshot {
            let mut rng = self.attempt_rng(&attacker.name, &target.txid);

            if !attacker
                .strategy
                .worth_attacking(target.total_input_value, &mut rng)
            {
                continue;
            }

            let attack_time = attacker.estimate_attack_time(target.key_count);
            let remaining = clock.remaining_block_time(target.broadcast_time);

            let verdict = if attack_time > remaining {
                Verdict::TooSlow {
                    attack_time,
                    remaining,
                }
            } else if rng.gen::<f64>() > attacker.quantum_computer.success_probability {
                Verdict::Decohered
            } else {
                let (competing, meta) = self.synthesize_spend(attacker, target, clock, &mut rng);
                Verdict::Success {
                    competing: Box::new(competing),
                    meta,
                }
            };

            attempts.push(Attempt {
                attacker: attacker.name.clone(),
                target: target.txid,
                verdict,
            });
        }

        attempts
    }

    /// Builds the competing double-spend: same input set as the victim, a
    /// fee of `min(10 × victim fee, 50% of input value)`, and a single
    /// output paying the attacker the remainder.
    fn synthesize_spend(
        &self,
        attacker: &Attacker,
        target: &TargetRow,
        clock: &ChainClock,
        rng: &mut StdRng,
    ) -> (Transaction, AttackMetadata) {
        let attack_fee = (target.fee * 10.0).min(target.total_input_value * 0.5);
        let value = target.total_input_value - attack_fee;
        let suffix: u16 = rng.gen_range(1000..10000);
        let destination = format!("bc1q_qattacker_{}_{suffix}", attacker.name);

        let txid = TxId::derive(&[
            b"attack-spend",
            &target.txid.0,
            attacker.name.as_bytes(),
        ]);

        // "Derived" signatures: the attacker signs with keys it broke.
        let signatures: Vec<String> = target
            .inputs
            .iter()
            .flat_map(|input| input.keys.iter())
            .map(|key| {
                digest(&[b"shor-derived", &txid.0, &key.0])
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect()
            })
            .collect();

        let competing = Transaction {
            txid,
            inputs: target.inputs.clone(),
            outputs: vec![OutputSpec::new(destination.clone(), value)],
            fee: attack_fee,
            signatures,
            status: TxStatus::Created,
            broadcast_time: clock.now,
            rbf_enabled: false,
            kind: TxKind::AttackSpend {
                victim: target.txid,
            },
            competing_txs: vec![target.txid],
            attack: None,
        };

        let meta = AttackMetadata {
            attacker: attacker.name.clone(),
            competing_txid: txid,
            attack_fee,
            destination,
            value,
        };

        (competing, meta)
    }

    /// Derives the per-attempt generator. Schedule-independent by
    /// construction: the draw depends only on the scan seed, the attacker,
    /// and the target.
    fn attempt_rng(&self, attacker: &str, target: &TxId) -> StdRng {
        let seed = digest(&[&self.seed.to_le_bytes(), attacker.as_bytes(), &target.0]);
        StdRng::from_seed(seed)
    }
}
