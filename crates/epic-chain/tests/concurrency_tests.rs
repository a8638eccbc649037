//! Concurrency tests for the ledger commit path
//!
//! Appends race each other and concurrent readers; every reader must see a
//! state where block sequence, index and pool agree.

use epic_chain::{BlockchainIndex, Ledger};
use epic_txpool::TxPool;
use epic_types::{Address, Block, Transaction, TxHash, TxInput, TxOutput};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn transaction(hash: &str) -> Transaction {
    let mut tx = Transaction::new(
        0,
        vec![TxInput {
            transaction_hash: TxHash::from("coinbase"),
            address: Address::from("miner"),
            amount: 5,
        }],
        vec![TxOutput {
            address: Address::from("shop"),
            amount: 4,
        }],
        1,
    )
    .with_signature("sig", "pk");
    tx.hash = TxHash::from(hash);
    tx
}

fn setup() -> Arc<Ledger> {
    Arc::new(Ledger::new(BlockchainIndex::new(), TxPool::with_defaults()).unwrap())
}

/// Block built off-lock against genesis; the default validator accepts it at
/// whatever position it lands
fn block_with(ledger: &Ledger, tag: &str, txs: usize) -> Block {
    let genesis = ledger.genesis();
    let txs = (0..txs).map(|i| transaction(&format!("{tag}-{i}"))).collect();
    Block::new(1, genesis.hash.clone(), txs, 0)
}

#[test]
fn test_two_threads_append() {
    let ledger = setup();
    let a = block_with(&ledger, "a", 2);
    let b = block_with(&ledger, "b", 3);
    let hashes = [a.hash.clone(), b.hash.clone()];

    thread::scope(|s| {
        s.spawn(|| ledger.append(a).unwrap());
        s.spawn(|| ledger.append(b).unwrap());
    });

    let blocks = ledger.blocks();
    assert_eq!(blocks.len(), 3);
    for hash in &hashes {
        assert!(blocks.iter().any(|block| &block.hash == hash));
        assert!(ledger.index().height_of(hash).is_some());
    }
    assert_eq!(ledger.index().tx_count(), 5);
}

#[test]
fn test_concurrent_appends_each_committed_once() {
    const THREADS: usize = 16;
    let ledger = setup();

    let blocks: Vec<Block> = (0..THREADS)
        .map(|t| block_with(&ledger, &format!("w{t}"), 4))
        .collect();
    for block in &blocks {
        for tx in &block.transactions {
            ledger.pool().add(tx.clone()).unwrap();
        }
    }

    thread::scope(|s| {
        for block in blocks.iter().cloned() {
            let ledger = &ledger;
            s.spawn(move || ledger.append(block).unwrap());
        }
    });

    let committed = ledger.blocks();
    assert_eq!(committed.len(), THREADS + 1);
    let unique: HashSet<_> = committed.iter().map(|b| b.hash.clone()).collect();
    assert_eq!(unique.len(), THREADS + 1);

    // Index positions agree with the final sequence
    for (height, block) in committed.iter().enumerate() {
        assert_eq!(ledger.index().height_of(&block.hash), Some(height as u64));
        for (position, tx) in block.transactions.iter().enumerate() {
            let location = ledger.index().locate(&tx.hash).unwrap();
            assert_eq!((location.height, location.position), (height as u64, position));
        }
    }
    assert!(ledger.pool().is_empty());
}

#[test]
fn test_readers_never_see_half_applied_block() {
    const BLOCKS: usize = 50;
    let ledger = setup();

    for b in 0..BLOCKS {
        for i in 0..3 {
            ledger.submit_transaction(transaction(&format!("r{b}-{i}"))).unwrap();
        }
    }

    thread::scope(|s| {
        s.spawn(|| {
            for b in 0..BLOCKS {
                let txs = (0..3).map(|i| transaction(&format!("r{b}-{i}"))).collect();
                let tip = ledger.tip();
                ledger
                    .append(Block::new(tip.height + 1, tip.hash.clone(), txs, b as u64))
                    .unwrap();
            }
        });

        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    ledger.with_view(|view| {
                        let pending: HashSet<TxHash> =
                            view.pending().into_iter().map(|tx| tx.hash).collect();
                        for block in view.blocks() {
                            for hash in block.tx_hashes() {
                                assert!(view.locate(hash).is_some(), "unindexed {hash}");
                                assert!(!pending.contains(hash), "still pending {hash}");
                            }
                        }
                        assert_eq!(view.index().indexed_blocks(), view.next_height());
                    });
                }
            });
        }
    });

    assert_eq!(ledger.len(), BLOCKS + 1);
    assert!(ledger.pending_snapshot().is_empty());
}

#[test]
fn test_submit_races_commit() {
    let ledger = setup();
    let block = block_with(&ledger, "race", 8);
    let txs = block.transactions.clone();

    thread::scope(|s| {
        s.spawn(|| ledger.append(block).unwrap());
        s.spawn(|| {
            for tx in txs {
                // Either lands before the commit and is pruned, or is refused
                let _ = ledger.submit_transaction(tx);
            }
        });
    });

    for i in 0..8 {
        let hash = TxHash::from(format!("race-{i}"));
        assert!(ledger.index().contains_tx(&hash));
        assert!(!ledger.pool().contains(&hash));
    }
}

#[test]
fn test_public_lookups_never_see_half_applied_block() {
    const BLOCKS: usize = 300;
    const TXS: usize = 20;
    let ledger = setup();
    let hashes: Vec<Vec<TxHash>> = (0..BLOCKS)
        .map(|b| (0..TXS).map(|i| TxHash::from(format!("p{b}-{i}"))).collect())
        .collect();
    for block in &hashes {
        for hash in block {
            ledger.submit_transaction(transaction(hash.as_str())).unwrap();
        }
    }
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        for _ in 0..3 {
            s.spawn(|| {
                let mut overlaps = 0usize;
                while !done.load(Ordering::Acquire) {
                    // The block currently being committed is the one after the tip
                    let next = ledger.len() - 1;
                    let Some(block) = hashes.get(next) else { continue };
                    for hash in block {
                        if ledger.index().contains_tx(hash) && ledger.pool().contains(hash) {
                            overlaps += 1;
                        }
                    }
                    let pending = ledger.pool().snapshot();
                    if pending.iter().any(|tx| ledger.index().contains_tx(&tx.hash)) {
                        overlaps += 1;
                    }
                }
                assert_eq!(overlaps, 0);
            });
        }

        s.spawn(|| {
            for block in &hashes {
                let txs = block.iter().map(|h| transaction(h.as_str())).collect();
                let tip = ledger.tip();
                ledger
                    .append(Block::new(tip.height + 1, tip.hash.clone(), txs, 0))
                    .unwrap();
            }
            done.store(true, Ordering::Release);
        });
    });

    assert_eq!(ledger.len(), BLOCKS + 1);
    assert_eq!(ledger.index().tx_count(), BLOCKS * TXS);
    assert!(ledger.pool().is_empty());
}

#[test]
fn test_pool_size_gauge_exact_under_contention() {
    let ledger = setup();
    let blocks: Vec<Block> = (0..8).map(|t| block_with(&ledger, &format!("g{t}"), 5)).collect();

    thread::scope(|s| {
        for block in &blocks {
            let ledger = &ledger;
            s.spawn(move || {
                // Refused once the block is in, pruned otherwise
                for tx in &block.transactions {
                    let _ = ledger.submit_transaction(tx.clone());
                }
                for i in 0..5 {
                    let _ = ledger.submit_transaction(transaction(&format!("{}-extra-{i}", block.hash)));
                }
            });
            s.spawn(move || {
                let _ = ledger.append(block.clone());
            });
        }
    });

    assert_eq!(
        ledger.metrics().gauge(epic_metrics::names::POOL_SIZE),
        Some(ledger.pool().len() as i64)
    );
}
