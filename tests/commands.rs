//! Integration tests for registry-level command dispatch
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use modnet_core::command::{
    ArgValue, ClientHandle, CommandBinding, CommandHandler, CommandRegistry, CommandSpec,
    ParamKind, ParamSpec, PrimitiveKind, ServerApi,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// FIXTURES
// ============================================================================

struct FakeServer {
    acl: bool,
    roster: Vec<ClientHandle>,
    sent: Mutex<Vec<String>>,
}

impl FakeServer {
    fn new(acl: bool, roster: Vec<ClientHandle>) -> Arc<Self> {
        Arc::new(Self {
            acl,
            roster,
            sent: Mutex::new(Vec::new()),
        })
    }
}

impl ServerApi for FakeServer {
    fn send_chat_message(&self, _target: &ClientHandle, message: &str) {
        self.sent.lock().unwrap().push(message.to_string());
    }

    fn client_by_name(&self, name: &str) -> Option<ClientHandle> {
        self.roster
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn acl_enabled(&self) -> bool {
        self.acl
    }
}

type CallLog = Arc<Mutex<Vec<(String, Vec<ArgValue>)>>>;

fn logging_handler(log: &CallLog, tag: &str) -> CommandHandler {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    Arc::new(move |args| {
        log.lock().unwrap().push((tag.clone(), args.to_vec()));
        Ok(())
    })
}

fn binding(
    name: &str,
    params: Vec<ParamSpec>,
    handler: CommandHandler,
) -> CommandBinding {
    CommandBinding::new(CommandSpec::named(name), "Command_Test", params, handler)
        .expect("binding should construct")
}

fn sender() -> ClientHandle {
    ClientHandle::new(1, "Operator")
}

// ============================================================================
// MULTI-RESOURCE DISPATCH
// ============================================================================

#[test]
fn shared_command_name_invokes_every_resource_once() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "freeroam",
            vec![binding(
                "foo",
                vec![
                    ParamSpec::sender(),
                    ParamSpec::new("value", ParamKind::Primitive(PrimitiveKind::Text)),
                ],
                logging_handler(&log, "freeroam"),
            )],
        )
        .unwrap();
    registry
        .register(
            "admin",
            vec![binding(
                "foo",
                vec![
                    ParamSpec::sender(),
                    ParamSpec::new("value", ParamKind::Primitive(PrimitiveKind::Text)),
                ],
                logging_handler(&log, "admin"),
            )],
        )
        .unwrap();

    let matched = registry.parse(&sender(), "/foo x").unwrap();
    assert!(matched);

    let log = log.lock().unwrap();
    let tags: Vec<&str> = log.iter().map(|(tag, _)| tag.as_str()).collect();
    assert_eq!(tags, ["freeroam", "admin"], "both handlers, registration order");
    for (_, args) in log.iter() {
        assert_eq!(args[1], ArgValue::Text("x".to_string()));
    }
}

#[test]
fn dispatch_order_is_registration_then_discovery_order() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "first",
            vec![
                binding("a", vec![ParamSpec::sender()], logging_handler(&log, "first/a")),
                binding("a", vec![ParamSpec::sender()], logging_handler(&log, "first/a2")),
            ],
        )
        .unwrap();
    registry
        .register(
            "second",
            vec![binding("a", vec![ParamSpec::sender()], logging_handler(&log, "second/a"))],
        )
        .unwrap();

    registry.parse(&sender(), "a").unwrap();
    let tags: Vec<String> = log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, ["first/a", "first/a2", "second/a"]);
}

#[test]
fn unregister_removes_exactly_that_resources_bindings() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "doomed",
            vec![binding("unique", vec![ParamSpec::sender()], logging_handler(&log, "doomed"))],
        )
        .unwrap();
    registry
        .register(
            "survivor",
            vec![binding("keeper", vec![ParamSpec::sender()], logging_handler(&log, "survivor"))],
        )
        .unwrap();

    registry.unregister("doomed").unwrap();

    assert!(!registry.parse(&sender(), "/unique").unwrap());
    assert!(registry.parse(&sender(), "/keeper").unwrap());

    let tags: Vec<String> = log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, ["survivor"]);
}

#[test]
fn reregistering_a_resource_replaces_its_bindings_in_place() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "gamemode",
            vec![binding("old", vec![ParamSpec::sender()], logging_handler(&log, "old"))],
        )
        .unwrap();
    registry
        .register(
            "gamemode",
            vec![binding("new", vec![ParamSpec::sender()], logging_handler(&log, "new"))],
        )
        .unwrap();

    assert!(!registry.parse(&sender(), "/old").unwrap());
    assert!(registry.parse(&sender(), "/new").unwrap());
    assert_eq!(
        registry.registered_resources().unwrap(),
        vec!["gamemode".to_string()]
    );
}

#[test]
fn unknown_command_matches_nothing() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    assert!(!registry.parse(&sender(), "/nothing registered").unwrap());
}

// ============================================================================
// ARGUMENT BINDING THROUGH THE REGISTRY
// ============================================================================

#[test]
fn two_argument_command_receives_coerced_arguments() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(Arc::clone(&api) as Arc<dyn ServerApi>);
    let log: CallLog = Arc::default();

    registry
        .register(
            "res",
            vec![binding(
                "cmd",
                vec![
                    ParamSpec::sender(),
                    ParamSpec::new("first", ParamKind::Primitive(PrimitiveKind::Text)),
                    ParamSpec::new("second", ParamKind::Primitive(PrimitiveKind::Text)),
                ],
                logging_handler(&log, "cmd"),
            )],
        )
        .unwrap();

    assert!(registry.parse(&sender(), "/cmd a b").unwrap());
    {
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        let args = &log[0].1;
        assert_eq!(args[0], ArgValue::Sender(sender()));
        assert_eq!(args[1], ArgValue::Text("a".to_string()));
        assert_eq!(args[2], ArgValue::Text("b".to_string()));
    }

    // too few arguments: matched, not invoked, usage reported
    assert!(registry.parse(&sender(), "/cmd a").unwrap());
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(
        api.sent.lock().unwrap().as_slice(),
        ["USAGE: /cmd sender [first] [second]"]
    );
}

#[test]
fn typed_arguments_cross_the_registry_boundary() {
    let roster = vec![ClientHandle::new(9, "Yuki")];
    let api = FakeServer::new(true, roster.clone());
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "admin",
            vec![binding(
                "slap",
                vec![
                    ParamSpec::sender(),
                    ParamSpec::new("target", ParamKind::Player),
                    ParamSpec::new("damage", ParamKind::Primitive(PrimitiveKind::Int)),
                    ParamSpec::new("ragdoll", ParamKind::Primitive(PrimitiveKind::Bool)),
                ],
                logging_handler(&log, "slap"),
            )],
        )
        .unwrap();

    assert!(registry.parse(&sender(), "/slap yuki 25 true").unwrap());
    let log = log.lock().unwrap();
    let args = &log[0].1;
    assert_eq!(args[1], ArgValue::Player(roster[0].clone()));
    assert_eq!(args[2], ArgValue::Int(25));
    assert_eq!(args[3], ArgValue::Bool(true));
}

#[test]
fn greedy_command_accepts_extra_tokens() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    registry
        .register(
            "chat",
            vec![CommandBinding::new(
                CommandSpec::named("announce").greedy(),
                "Command_Announce",
                vec![
                    ParamSpec::sender(),
                    ParamSpec::new("message", ParamKind::Greedy),
                ],
                logging_handler(&log, "announce"),
            )
            .unwrap()],
        )
        .unwrap();

    assert!(registry
        .parse(&sender(), "/announce server restarting in 5 minutes")
        .unwrap());
    let log = log.lock().unwrap();
    assert_eq!(
        log[0].1[1],
        ArgValue::Text("server restarting in 5 minutes".to_string())
    );
}

#[test]
fn acl_gated_command_refuses_across_the_registry() {
    let api = FakeServer::new(false, vec![]);
    let registry = CommandRegistry::new(Arc::clone(&api) as Arc<dyn ServerApi>);
    let log: CallLog = Arc::default();

    registry
        .register(
            "admin",
            vec![CommandBinding::new(
                CommandSpec::named("ban").acl_required(),
                "Command_Ban",
                vec![ParamSpec::sender()],
                logging_handler(&log, "ban"),
            )
            .unwrap()],
        )
        .unwrap();

    assert!(registry.parse(&sender(), "/ban").unwrap());
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(
        api.sent.lock().unwrap().as_slice(),
        ["ERROR: ACL must be running!"]
    );
}

#[test]
fn failing_handler_does_not_stop_other_resources() {
    let api = FakeServer::new(true, vec![]);
    let registry = CommandRegistry::new(api);
    let log: CallLog = Arc::default();

    let failing: CommandHandler =
        Arc::new(|_| Err(modnet_core::CoreError::Handler("script panic".to_string())));
    registry
        .register("broken", vec![binding("go", vec![ParamSpec::sender()], failing)])
        .unwrap();
    registry
        .register(
            "healthy",
            vec![binding("go", vec![ParamSpec::sender()], logging_handler(&log, "healthy"))],
        )
        .unwrap();

    assert!(registry.parse(&sender(), "/go").unwrap());
    let tags: Vec<String> = log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, ["healthy"]);
}
