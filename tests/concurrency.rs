//! Registry behavior under concurrent registration, unregistration and dispatch
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use modnet_core::command::{
    ClientHandle, CommandBinding, CommandHandler, CommandRegistry, CommandSpec, ParamSpec,
    ServerApi,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

struct NullServer;

impl ServerApi for NullServer {
    fn send_chat_message(&self, _target: &ClientHandle, _message: &str) {}

    fn client_by_name(&self, _name: &str) -> Option<ClientHandle> {
        None
    }

    fn acl_enabled(&self) -> bool {
        true
    }
}

fn counting_binding(name: &str, counter: &Arc<AtomicUsize>) -> CommandBinding {
    let counter = Arc::clone(counter);
    let handler: CommandHandler = Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    CommandBinding::new(
        CommandSpec::named(name),
        "Command_Count",
        vec![ParamSpec::sender()],
        handler,
    )
    .unwrap()
}

#[test]
fn dispatch_runs_concurrently_with_hot_reload() {
    let registry = Arc::new(CommandRegistry::new(Arc::new(NullServer)));
    let invocations = Arc::new(AtomicUsize::new(0));

    // a stable resource that stays registered for the whole test
    registry
        .register("stable", vec![counting_binding("ping", &invocations)])
        .unwrap();

    let mut handles = Vec::new();

    // churn threads: load/unload resources while traffic flows
    for worker in 0..4usize {
        let registry = Arc::clone(&registry);
        let invocations = Arc::clone(&invocations);
        handles.push(thread::spawn(move || {
            let resource = format!("churn-{worker}");
            for _ in 0..200 {
                registry
                    .register(&resource, vec![counting_binding("ping", &invocations)])
                    .unwrap();
                registry.unregister(&resource).unwrap();
            }
        }));
    }

    // dispatch threads: every parse must match at least the stable resource
    let dispatches = 300usize;
    for client in 0..4u64 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let sender = ClientHandle::new(client, format!("client-{client}"));
            for _ in 0..dispatches {
                let matched = registry.parse(&sender, "/ping").unwrap();
                assert!(matched, "stable resource must always match");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // every dispatch hit the stable binding; churn bindings add on top
    assert!(invocations.load(Ordering::SeqCst) >= 4 * dispatches);

    // churned resources must all be gone
    let remaining = registry.registered_resources().unwrap();
    assert_eq!(remaining, vec!["stable".to_string()]);
}

#[test]
fn concurrent_registration_of_distinct_resources_keeps_all() {
    let registry = Arc::new(CommandRegistry::new(Arc::new(NullServer)));
    let counter = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for worker in 0..8usize {
        let registry = Arc::clone(&registry);
        let counter = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            let resource = format!("res-{worker}");
            registry
                .register(&resource, vec![counting_binding("shared", &counter)])
                .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.registered_resources().unwrap().len(), 8);

    // one dispatch fans out to all eight resources
    let sender = ClientHandle::new(1, "solo");
    assert!(registry.parse(&sender, "shared").unwrap());
    assert_eq!(counter.load(Ordering::SeqCst), 8);
}
