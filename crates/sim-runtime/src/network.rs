//! The network facade.
//!
//! `QuantumNetwork` owns the registry, the pool, the attacker roster, and
//! the clock, and exposes the round loop: broadcast wallet spends, run the
//! attack scan, mine. Mining settles every conflict group, credits
//! attackers, marks winning inputs spent, and archives the drained pool so
//! outcomes stay queryable after the block.

use crate::config::NetworkConfig;
use crate::error::Result;
use qs_01_wallet::UtxoRegistry;
use qs_02_mempool::Mempool;
use qs_03_attack_engine::{
    AttackEngine, AttackStrategy, AttackerRegistry, QuantumCapability, ScanReport,
};
use qs_04_block_selection::{BlockSelector, BlockSummary};
use shared_types::{
    AddressType, Amount, ChainClock, OutputSpec, Transaction, TxId, Utxo, UtxoId,
};
use std::collections::BTreeMap;

/// Aggregate counters over the whole run.
#[derive(Clone, Debug, Default)]
pub struct NetworkStats {
    /// Current chain height.
    pub height: u64,
    /// Simulated seconds elapsed.
    pub now: f64,
    /// Transactions currently pooled.
    pub pool_size: usize,
    /// Blocks mined so far.
    pub blocks_mined: usize,
    /// Wallet transactions confirmed honestly.
    pub confirmed: usize,
    /// Wallet transactions stolen.
    pub stolen: usize,
    /// Coins diverted to attackers.
    pub total_stolen_value: Amount,
    /// Fees collected across all blocks.
    pub total_fees: Amount,
}

/// All simulation state behind one handle.
pub struct QuantumNetwork {
    config: NetworkConfig,
    registry: UtxoRegistry,
    pool: Mempool,
    attackers: AttackerRegistry,
    engine: AttackEngine,
    selector: BlockSelector,
    clock: ChainClock,
    /// Every transaction that left the pool, by id.
    history: BTreeMap<TxId, Transaction>,
    blocks: Vec<BlockSummary>,
}

impl QuantumNetwork {
    /// Builds a network from configuration. One seed drives everything.
    pub fn new(config: NetworkConfig) -> Self {
        let clock = ChainClock::new(config.start_height, config.avg_block_interval_secs);
        tracing::info!(
            height = config.start_height,
            interval = config.avg_block_interval_secs,
            seed = config.rng_seed,
            "network initialized"
        );
        Self {
            registry: UtxoRegistry::new(config.rng_seed),
            pool: Mempool::new(config.mempool()),
            attackers: AttackerRegistry::new(),
            engine: AttackEngine::new(config.rng_seed),
            selector: BlockSelector,
            clock,
            history: BTreeMap::new(),
            blocks: Vec::new(),
            config,
        }
    }

    /// Adds an attacker to the roster. Registration order is attack
    /// priority: earlier attackers claim contested targets first.
    pub fn register_attacker(
        &mut self,
        name: impl Into<String>,
        quantum_computer: QuantumCapability,
        strategy: AttackStrategy,
    ) {
        let name = name.into();
        tracing::info!(
            attacker = %name,
            machine = %quantum_computer.name,
            qubits = quantum_computer.qubits,
            shor_capable = quantum_computer.can_break_secp256k1(),
            "attacker registered"
        );
        self.attackers.register(name, quantum_computer, strategy);
    }

    /// Funds a fresh output at the current height.
    pub fn create_output(&mut self, address_type: AddressType, amount: Amount) -> Result<Utxo> {
        let height = self.clock.height;
        Ok(self.registry.create_output(address_type, amount, height)?)
    }

    /// Funds an output that reuses the key material of `source`; its keys
    /// arrive pre-exposed, giving attackers the full block interval.
    pub fn create_reused_output(
        &mut self,
        address_type: AddressType,
        amount: Amount,
        source: &UtxoId,
    ) -> Result<Utxo> {
        let height = self.clock.height;
        Ok(self
            .registry
            .create_reused_output(address_type, amount, height, source)?)
    }

    /// Builds a wallet spend at the current clock without broadcasting it.
    /// The caller holds the `Created` transaction until `broadcast`.
    pub fn build_transaction(
        &mut self,
        inputs: &[UtxoId],
        outputs: &[OutputSpec],
        fee: Amount,
        rbf: bool,
    ) -> Result<Transaction> {
        Ok(self
            .registry
            .build_transaction(inputs, outputs, fee, rbf, self.clock.now)?)
    }

    /// Admits a built transaction into the pool.
    pub fn broadcast(&mut self, tx: Transaction) -> Result<TxId> {
        Ok(self.pool.admit(tx)?)
    }

    /// Builds a wallet spend and broadcasts it in one step.
    pub fn broadcast_transaction(
        &mut self,
        inputs: &[UtxoId],
        outputs: &[OutputSpec],
        fee: Amount,
        rbf: bool,
    ) -> Result<TxId> {
        let tx = self.build_transaction(inputs, outputs, fee, rbf)?;
        self.broadcast(tx)
    }

    /// Builds a replacement spend and runs it through RBF.
    pub fn replace_by_fee(
        &mut self,
        inputs: &[UtxoId],
        outputs: &[OutputSpec],
        fee: Amount,
    ) -> Result<TxId> {
        let tx = self
            .registry
            .build_transaction(inputs, outputs, fee, true, self.clock.now)?;
        let (txid, evicted) = self.pool.replace_by_fee(tx)?;
        for replaced in evicted {
            self.history.insert(replaced.txid, replaced);
        }
        Ok(txid)
    }

    /// Lets every attacker evaluate the pool once.
    pub fn run_attack_scan(&mut self) -> ScanReport {
        self.engine
            .run_scan(&mut self.pool, &mut self.attackers, &self.clock)
    }

    /// Mines a block: settles conflicts, credits attackers, marks winning
    /// inputs spent, archives the drained pool, and advances the clock.
    pub fn mine_block(&mut self) -> BlockSummary {
        let summary = self.selector.resolve(&mut self.pool, self.clock.height + 1);

        for theft in &summary.thefts {
            self.attackers.credit_success(&theft.attacker, theft.value);
        }

        // Winners consumed their inputs; stolen victims lost theirs to the
        // same input set.
        for tx in summary
            .confirmed
            .iter()
            .chain(summary.attack_spends.iter())
            .chain(summary.stolen.iter())
        {
            for input in &tx.inputs {
                self.registry.mark_spent(&input.utxo);
            }
        }

        for tx in summary
            .confirmed
            .iter()
            .chain(summary.stolen.iter())
            .chain(summary.attack_spends.iter())
            .chain(summary.discarded.iter())
        {
            self.history.insert(tx.txid, tx.clone());
        }

        self.clock.advance_block();
        self.blocks.push(summary.clone());
        summary
    }

    /// Looks up a transaction, pooled or settled.
    pub fn transaction(&self, txid: &TxId) -> Option<&Transaction> {
        self.pool.get(txid).or_else(|| self.history.get(txid))
    }

    /// Looks up an output.
    pub fn utxo(&self, id: &UtxoId) -> Option<&Utxo> {
        self.registry.get(id)
    }

    /// The attacker roster.
    pub fn attackers(&self) -> &AttackerRegistry {
        &self.attackers
    }

    /// The live pool.
    pub fn pool(&self) -> &Mempool {
        &self.pool
    }

    /// The chain clock.
    pub fn clock(&self) -> &ChainClock {
        &self.clock
    }

    /// Summaries of every mined block, oldest first.
    pub fn blocks(&self) -> &[BlockSummary] {
        &self.blocks
    }

    /// The active configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Aggregate run counters.
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats {
            height: self.clock.height,
            now: self.clock.now,
            pool_size: self.pool.len(),
            blocks_mined: self.blocks.len(),
            ..Default::default()
        };
        for block in &self.blocks {
            stats.confirmed += block.confirmed.len();
            stats.stolen += block.stolen.len();
            stats.total_fees += block.total_fees();
        }
        stats.total_stolen_value = self.attackers.iter().map(|a| a.total_stolen).sum();
        stats
    }
}
