//! Modules wired from configuration, running under the supervisor against
//! in-memory collaborators.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use lazyhost::application::Supervisor;
use lazyhost::domain::Hastings;
use lazyhost::infrastructure::bootstrap::{build_modules, Collaborators};
use lazyhost::infrastructure::config::settings::ModuleConfigs;
use lazyhost::testkit::config::full_config;
use lazyhost::testkit::node::{NodeCall, ScriptedNode};
use lazyhost::testkit::system::{RecordingRunner, StaticRanking};

fn collaborators(node: &Arc<ScriptedNode>, runner: &Arc<RecordingRunner>) -> Collaborators {
    let node: Arc<ScriptedNode> = Arc::clone(node);
    let runner: Arc<RecordingRunner> = Arc::clone(runner);
    Collaborators {
        node,
        ranking: Arc::new(StaticRanking::new(None)),
        runner,
        throttle: None,
    }
}

fn only(select: impl FnOnce(&mut ModuleConfigs, ModuleConfigs)) -> ModuleConfigs {
    let mut modules = ModuleConfigs::default();
    select(&mut modules, full_config().modules);
    modules
}

fn payments(node: &ScriptedNode) -> Vec<(Hastings, String)> {
    node.calls()
        .into_iter()
        .filter_map(|call| match call {
            NodeCall::SendPayment(amount, address) => Some((amount, address)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn locked_wallet_is_unlocked_and_surplus_paid_out_once() {
    let node = Arc::new(ScriptedNode::new().with_locked_wallet().with_balance(dec!(700)));
    let runner = Arc::new(RecordingRunner::new());
    let modules = only(|m, full| {
        m.unlock = full.unlock;
        m.payout = full.payout;
    });

    let built = build_modules(&modules, &collaborators(&node, &runner)).unwrap();
    let handle = Supervisor::new(built).start();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(node
        .calls()
        .contains(&NodeCall::UnlockWallet("seed words".into())));
    assert_eq!(
        payments(&node),
        vec![
            (Hastings::from_siacoins(dec!(100)).unwrap(), "addr-rent".into()),
            (Hastings::from_siacoins(dec!(50.5)).unwrap(), "addr-savings".into()),
        ]
    );

    // 549.5 SC left is below the 650.5 SC threshold.
    tokio::time::sleep(Duration::from_secs(4 * 3600)).await;
    assert_eq!(payments(&node).len(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn long_outage_restarts_the_daemon_without_faulting_other_modules() {
    let node = Arc::new(ScriptedNode::new().with_locked_wallet());
    node.set_reachable(false);
    let runner = Arc::new(RecordingRunner::new());
    let modules = only(|m, full| {
        m.unlock = full.unlock;
        m.restart = full.restart;
    });

    let built = build_modules(&modules, &collaborators(&node, &runner)).unwrap();
    let handle = Supervisor::new(built).start();

    // Checks run every 300s starting at t=0; the 60th fails at t=17700.
    tokio::time::sleep(Duration::from_secs(17_650)).await;
    assert!(runner.commands().is_empty());

    tokio::time::sleep(Duration::from_secs(55)).await;
    assert_eq!(runner.commands(), vec!["systemctl stop siad"]);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(
        runner.commands(),
        vec!["systemctl stop siad", "systemctl start siad"]
    );

    // Unreachable daemon is a skipped cycle, never a module fault.
    assert!(handle.statuses().iter().all(|s| s.restarts == 0));

    node.set_reachable(true);
    tokio::time::sleep(Duration::from_secs(700)).await;
    assert!(node
        .calls()
        .contains(&NodeCall::UnlockWallet("seed words".into())));
    assert_eq!(runner.commands().len(), 2);

    handle.shutdown().await;
}
