//! Proof-of-fee conflict resolution.
//!
//! Miners are fee-maximizing: within a conflict group the highest fee wins,
//! regardless of which transaction is legitimate. A quantum attacker does
//! not need to out-hash the network, only out-bid the victim.

use qs_02_mempool::Mempool;
use shared_types::{Amount, Height, Transaction, TxId, TxKind, TxStatus};
use std::collections::BTreeSet;

/// A settled successful theft, lifted from the victim's attack record.
#[derive(Clone, Debug)]
pub struct Theft {
    /// Attacker to credit.
    pub attacker: String,
    /// The wallet transaction that lost its inputs.
    pub victim: TxId,
    /// The competing spend that won the fee race.
    pub competing: TxId,
    /// Value diverted to the attacker, in coins.
    pub value: Amount,
}

/// Everything one block settles, partitioned by outcome.
///
/// `attack_spends` holds winning synthetic transactions: they finalize the
/// theft but are reported apart from the honest confirmed set.
#[derive(Clone, Debug)]
pub struct BlockSummary {
    /// Height of the mined block.
    pub height: Height,
    /// Wallet transactions finalized honestly (`Confirmed`).
    pub confirmed: Vec<Transaction>,
    /// Victims that lost the fee race (`Stolen`).
    pub stolen: Vec<Transaction>,
    /// Winning attacker-synthesized spends.
    pub attack_spends: Vec<Transaction>,
    /// Conflict-group losers, dropped without a status transition.
    pub discarded: Vec<Transaction>,
    /// One record per settled theft, in group order.
    pub thefts: Vec<Theft>,
}

impl BlockSummary {
    /// Fees collected by the miner: every winner pays, honest or not.
    pub fn total_fees(&self) -> Amount {
        self.confirmed
            .iter()
            .chain(self.attack_spends.iter())
            .map(|tx| tx.fee)
            .sum()
    }

    /// Ids of the honestly confirmed transactions.
    pub fn confirmed_ids(&self) -> Vec<TxId> {
        self.confirmed.iter().map(|tx| tx.txid).collect()
    }
}

/// Resolves the pool into a block. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockSelector;

impl BlockSelector {
    /// Settles every conflict group and drains the pool into a summary.
    ///
    /// Per group the highest-fee member wins (ties break to the smallest
    /// id). A winning `Broadcast` transaction confirms; a winning attack
    /// spend steals from its victim; a winner that is itself `Attacked`
    /// (possible only when the competing spend never out-bid it) is stolen
    /// in place. Losers are never transitioned.
    #[tracing::instrument(skip_all, fields(height = height, pool = pool.len()))]
    pub fn resolve(&self, pool: &mut Mempool, height: Height) -> BlockSummary {
        let mut winners: BTreeSet<TxId> = BTreeSet::new();
        let mut thefts: Vec<Theft> = Vec::new();

        for (_, members) in pool.conflict_groups() {
            let winner = self.fee_race_winner(pool, &members);
            winners.insert(winner);
            self.settle(pool, winner, &mut thefts);
        }

        let mut summary = BlockSummary {
            height,
            confirmed: Vec::new(),
            stolen: Vec::new(),
            attack_spends: Vec::new(),
            discarded: Vec::new(),
            thefts,
        };

        for tx in pool.drain() {
            match tx.status {
                TxStatus::Confirmed => summary.confirmed.push(tx),
                TxStatus::Stolen => summary.stolen.push(tx),
                _ if winners.contains(&tx.txid) => summary.attack_spends.push(tx),
                _ => summary.discarded.push(tx),
            }
        }

        tracing::info!(
            height,
            confirmed = summary.confirmed.len(),
            stolen = summary.stolen.len(),
            discarded = summary.discarded.len(),
            fees = summary.total_fees(),
            "block mined"
        );

        summary
    }

    /// Highest fee wins; fee ties break to the smallest id. `members` come
    /// from the conflict grouping in id order, so keeping the first strict
    /// maximum does both at once.
    fn fee_race_winner(&self, pool: &Mempool, members: &[TxId]) -> TxId {
        let mut winner = members[0];
        let mut best_fee = pool.get(&winner).expect("group members are pooled").fee;
        for txid in &members[1..] {
            let fee = pool.get(txid).expect("group members are pooled").fee;
            if fee > best_fee {
                winner = *txid;
                best_fee = fee;
            }
        }
        winner
    }

    fn settle(&self, pool: &mut Mempool, winner: TxId, thefts: &mut Vec<Theft>) {
        let (kind, status) = {
            let tx = pool.get(&winner).expect("winner is pooled");
            (tx.kind.clone(), tx.status)
        };

        match kind {
            TxKind::AttackSpend { victim } => {
                // Same input set, so the victim shares the group and is
                // still pooled.
                let victim_tx = pool.get_mut(&victim).expect("victim shares the group");
                victim_tx
                    .mark_stolen()
                    .expect("attack spends exist only for attacked victims");
                let meta = victim_tx
                    .attack
                    .clone()
                    .expect("attacked transactions carry their settlement record");
                tracing::warn!(
                    attacker = %meta.attacker,
                    victim = %victim.short(),
                    value = meta.value,
                    "double-spend won the fee race: funds stolen"
                );
                thefts.push(Theft {
                    attacker: meta.attacker,
                    victim,
                    competing: winner,
                    value: meta.value,
                });
            }
            TxKind::Regular if status == TxStatus::Attacked => {
                // The competing spend failed to out-bid (a zero-fee victim
                // caps the attack fee at zero): the attacked winner is
                // still stolen, per the attack claim.
                let tx = pool.get_mut(&winner).expect("winner is pooled");
                tx.mark_stolen().expect("status checked above");
                let meta = tx
                    .attack
                    .clone()
                    .expect("attacked transactions carry their settlement record");
                thefts.push(Theft {
                    attacker: meta.attacker,
                    victim: winner,
                    competing: meta.competing_txid,
                    value: meta.value,
                });
            }
            TxKind::Regular => {
                let tx = pool.get_mut(&winner).expect("winner is pooled");
                tx.mark_confirmed().expect("uncontested winners are broadcast");
            }
        }
    }
}
