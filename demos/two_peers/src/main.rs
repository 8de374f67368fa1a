//! Two Peers Demo
//!
//! Alice and Bob share one object over an in-memory link. Alice moves it
//! while it is free and Bob's view converges on her updates. Bob then grabs
//! it; nothing is broadcast while he holds it or while it settles. Once
//! free again, Bob's own moves reach Alice. Along the way one frame is lost
//! in transit and the link drops for a few ticks; later updates recover.
//!
//! Usage: `two_peers [config.ron]`

use posesync_core::{DQuat, DVec3, Pose, SyncConfig};
use posesync_netcode::{ConvergenceIntegrator, MemoryTransport, PoseSync, TickReport};
use std::process::ExitCode;

const DT: f64 = 1.0 / 30.0;
const AGREEMENT: f64 = 1e-3;

fn load_config() -> Result<SyncConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
            SyncConfig::from_ron(&text).map_err(|e| e.to_string())
        }
        None => Ok(SyncConfig::default()),
    }
}

fn print_tick(tick: usize, alice: &TickReport, bob: &TickReport) {
    println!(
        "Tick {:3}: alice ({:6.3}, {:6.3}) {}  bob ({:6.3}, {:6.3}) {}",
        tick,
        alice.pose.position.x,
        alice.pose.position.z,
        if alice.sent.is_some() { "->" } else { "  " },
        bob.pose.position.x,
        bob.pose.position.z,
        if bob.sent.is_some() { "->" } else { "  " },
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Posesync Two Peers Demo ===\n");
    println!("{:?}\n", config);

    let (alice_link, bob_link) = MemoryTransport::pair();
    let spawn = Pose::IDENTITY;
    let (mut alice, mut bob) = match (
        PoseSync::new(config, spawn, alice_link),
        PoseSync::new(config, spawn, bob_link),
    ) {
        (Ok(alice), Ok(bob)) => (alice, bob),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("failed to create peers: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Alice nudges the object along X...\n");
    for tick in 0..10 {
        let step = DVec3::new(0.05 * (tick + 1) as f64, 0.0, 0.0);
        match tick {
            6 => {
                alice.transport().disconnect();
                println!("          (link down)");
            }
            8 => {
                alice.transport().reconnect();
                println!("          (link up)");
            }
            _ => {}
        }
        alice.set_local_pose(Pose::from_position(step));
        let a = alice.tick(DT);
        if tick == 3 {
            let lost = bob.transport().drop_pending();
            println!("          ({} frame lost in transit)", lost);
        }
        let b = bob.tick(DT);
        print_tick(tick, &a, &b);
    }

    println!("\nBob grabs it and carries it around a circle (no broadcast while held)...\n");
    bob.on_grab_start();
    for tick in 10..40 {
        let angle = (tick - 10) as f64 * 0.1;
        let carried = Pose::new(
            DVec3::new(angle.cos(), 0.0, angle.sin()),
            DQuat::from_rotation_y(angle),
        );
        bob.set_local_pose(carried);
        let a = alice.tick(DT);
        let b = bob.tick(DT);
        print_tick(tick, &a, &b);
    }

    println!("\nBob lets go; settling for {} time units...\n", config.settle_delay);
    bob.on_grab_end();
    let mut tick = 40;
    while bob.authority() != posesync_core::AuthorityState::Free {
        let a = alice.tick(DT);
        let b = bob.tick(DT);
        print_tick(tick, &a, &b);
        tick += 1;
    }

    println!("\nBob drops it to the floor on his own...\n");
    let resting = Pose::from_position(DVec3::new(0.5, -1.0, 0.5));
    for _ in 0..30 {
        bob.set_local_pose(resting);
        let a = alice.tick(DT);
        let b = bob.tick(DT);
        print_tick(tick, &a, &b);
        tick += 1;
    }

    println!("\nAlice stats: {:?}", alice.stats());
    println!("Bob stats:   {:?}", bob.stats());
    println!(
        "Alice is {:.4} m from Bob's last broadcast",
        alice.pose().distance_to(&bob.last_sent())
    );
    if ConvergenceIntegrator::has_converged(&alice.pose(), &bob.pose(), AGREEMENT) {
        println!("Both peers agree on the pose");
    } else {
        println!("Peers still disagree (more ticks needed)");
    }
    println!("\n=== Demo Complete ===");
    ExitCode::SUCCESS
}
