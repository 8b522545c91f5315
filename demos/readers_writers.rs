//! Readers-writers demonstration: ten reader and ten writer threads contend
//! for one shared journal behind an [`RWLock`]. The console output shows
//! readers overlapping each other while every writer runs alone.
//!
//! Run with `cargo run --example readers_writers`.

use std::thread;
use std::time::Duration;

use rwgate::sync::RWLock;
use tracing::info;

const READERS: usize = 10;
const WRITERS: usize = 10;

fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let journal = RWLock::new(Vec::<String>::new());

    thread::scope(|scope| {
        for id in 0..READERS {
            let journal = &journal;
            scope.spawn(move || read_journal(id, journal));
        }

        for id in 0..WRITERS {
            let journal = &journal;
            scope.spawn(move || write_journal(id, journal));
        }
    });

    info!("done, the journal holds {} entries", journal.read().len());
}

fn read_journal(id: usize, journal: &RWLock<Vec<String>>) {
    let entries = journal.read_gate().acquire();
    info!("reader {id} begins reading ({} entries)", entries.len());
    simulate_work();
    info!("reader {id} finishes reading");
}

fn write_journal(id: usize, journal: &RWLock<Vec<String>>) {
    let mut entries = journal.write_gate().acquire();
    info!("writer {id} begins writing");
    simulate_work();
    entries.push(format!("entry from writer {id}"));
    info!("writer {id} finishes writing");
}

fn simulate_work() {
    thread::sleep(Duration::from_millis(fastrand::u64(50..250)));
}
