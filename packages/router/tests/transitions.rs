use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};

use hashbang_router::prelude::*;
use pretty_assertions::assert_eq;

type Log = Rc<RefCell<Vec<String>>>;

/// A gate that holds on to its signals until the test confirms them.
#[derive(Default)]
struct RecordingGate {
    pending: RefCell<VecDeque<GateSignal>>,
    requests: RefCell<Vec<GateEvent>>,
}

impl RecordingGate {
    fn confirm(&self) -> Option<GateEvent> {
        let signal = self.pending.borrow_mut().pop_front()?;
        let event = signal.event();
        signal.confirm();
        Some(event)
    }

    fn requests(&self) -> Vec<GateEvent> {
        self.requests.borrow().clone()
    }

    fn waiting(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl LoadingGate for RecordingGate {
    fn show(&self, done: GateSignal) {
        self.requests.borrow_mut().push(GateEvent::Shown);
        self.pending.borrow_mut().push_back(done);
    }

    fn hide(&self, done: GateSignal) {
        self.requests.borrow_mut().push(GateEvent::Hidden);
        self.pending.borrow_mut().push_back(done);
    }
}

struct Home {
    log: Log,
}

impl PageController for Home {
    fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {
        self.log.borrow_mut().push(String::from("Home:set_globals"));
    }

    fn prerender(&mut self, cx: ControllerContext) {
        self.log.borrow_mut().push(String::from("Home:prerender"));
        cx.view_rendered();
    }

    fn postrender(&mut self) {
        self.log.borrow_mut().push(String::from("Home:postrender"));
    }

    fn before_leave(&mut self) {
        self.log.borrow_mut().push(String::from("Home:before_leave"));
    }
}

/// Renders the requested number of users. Anything that is not a number is corrected to the
/// plain listing.
struct Users {
    log: Log,
    count: Option<String>,
}

impl PageController for Users {
    fn set_globals(&mut self, parameters: RouteParameters, _: Option<String>) {
        self.count = parameters.get("nbOfUsers").cloned().flatten();
        self.log.borrow_mut().push(format!(
            "Users:set_globals({})",
            self.count.as_deref().unwrap_or("-")
        ));
    }

    fn prerender(&mut self, cx: ControllerContext) {
        self.log.borrow_mut().push(String::from("Users:prerender"));
        if let Some(count) = &self.count {
            if count.parse::<u32>().is_err() {
                cx.redirect("/generateusers");
            }
        }
        cx.view_rendered();
    }

    fn postrender(&mut self) {
        self.log.borrow_mut().push(String::from("Users:postrender"));
    }

    fn before_leave(&mut self) {
        self.log.borrow_mut().push(String::from("Users:before_leave"));
    }
}

struct Broken {
    log: Log,
}

impl PageController for Broken {
    fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}

    fn prerender(&mut self, cx: ControllerContext) {
        self.log.borrow_mut().push(String::from("Broken:prerender"));
        cx.prerender_failed("backend unavailable");
    }

    fn postrender(&mut self) {
        self.log.borrow_mut().push(String::from("Broken:postrender"));
    }
}

fn routes() -> RouteTable {
    RouteTable::new(vec![
        RouteDefinition::new("Home", "/").source_path("pages/home"),
        RouteDefinition::new("Users", "/generateusers")
            .source_path("pages/users")
            .parameters(["nbOfUsers"]),
        RouteDefinition::new("Broken", "/broken"),
    ])
    .unwrap()
}

fn registry(log: &Log) -> ControllerRegistry {
    let home = log.clone();
    let users = log.clone();
    let broken = log.clone();
    ControllerRegistry::new()
        .register("Home", move || Box::new(Home { log: home.clone() }))
        .register("Users", move || {
            Box::new(Users {
                log: users.clone(),
                count: None,
            })
        })
        .register("Broken", move || Box::new(Broken { log: broken.clone() }))
}

struct Harness {
    router: RouterService,
    cx: RouterContext,
    history: Rc<MemoryHistory>,
    gate: Rc<RecordingGate>,
    timer: Rc<ManualTimer>,
    log: Log,
    updates: Rc<Cell<usize>>,
    initial_renders: Rc<Cell<usize>>,
}

impl Harness {
    fn new(hash: &str) -> Self {
        Self::with_config(hash, RouterConfig::default())
    }

    fn with_config(hash: &str, config: RouterConfig) -> Self {
        let history = Rc::new(MemoryHistory::with_initial_hash(hash));
        let gate = Rc::new(RecordingGate::default());
        let timer = Rc::new(ManualTimer::default());
        let updates = Rc::new(Cell::new(0));
        let initial_renders = Rc::new(Cell::new(0));

        let u = updates.clone();
        let i = initial_renders.clone();
        let config = config
            .on_update(move |_| u.set(u.get() + 1))
            .on_initial_render(move |_| i.set(i.get() + 1));

        let (router, cx) = RouterService::new(
            routes(),
            config,
            history.clone(),
            gate.clone(),
            timer.clone(),
        );

        Self {
            router,
            cx,
            history,
            gate,
            timer,
            log: Log::default(),
            updates,
            initial_renders,
        }
    }

    /// Start the router, hand it the controllers and run the first transition to the end.
    fn boot(hash: &str) -> Self {
        let mut harness = Self::new(hash);
        harness.router.start();
        harness.cx.provide_controllers(registry(&harness.log));
        harness.settle();
        harness.log.borrow_mut().clear();
        harness
    }

    /// Confirm gate requests and fire timers until the router has nothing left to do.
    fn settle(&mut self) {
        loop {
            self.router.flush();
            if self.gate.confirm().is_some() {
                continue;
            }
            if self.timer.fire_all() > 0 {
                continue;
            }
            break;
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn current(&self) -> RouteEvaluation {
        self.router.route_state().current().unwrap()
    }
}

#[test]
fn initial_route_waits_for_controllers() {
    let mut harness = Harness::new("#!/");
    harness.router.start();

    assert_eq!(harness.router.phase(), RouterPhase::AwaitingControllers);
    assert!(harness.router.is_busy());
    assert_eq!(harness.current().matched_route.controller_id, "Home");
    assert!(harness.log().is_empty());

    harness.cx.provide_controllers(registry(&harness.log));
    harness.router.flush();

    assert_eq!(
        harness.log(),
        vec!["Home:set_globals", "Home:prerender", "Home:postrender"]
    );
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateHidden);
    assert!(!harness.router.is_busy());
    assert_eq!(harness.updates.get(), 1);
    assert_eq!(harness.initial_renders.get(), 1);

    // the gate was never shown for the first route, it is only asked to hide
    assert_eq!(harness.gate.requests(), vec![GateEvent::Hidden]);
    assert_eq!(harness.gate.confirm(), Some(GateEvent::Hidden));
    harness.router.flush();

    assert_eq!(harness.router.phase(), RouterPhase::Settling);
    assert!(!harness.router.is_listening());
    assert_eq!(harness.timer.pending_delays(), vec![Duration::from_millis(100)]);

    harness.timer.fire_all();
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert!(harness.router.is_listening());
    assert_eq!(harness.history.current_hash(), "#!/");
}

#[test]
fn controllers_provided_before_start() {
    let mut harness = Harness::new("#!/generateusers/3");
    harness.cx.provide_controllers(registry(&harness.log));
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::Initial);

    harness.router.start();
    assert_eq!(harness.router.phase(), RouterPhase::Rendering);

    harness.settle();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert_eq!(
        harness.log(),
        vec!["Users:set_globals(3)", "Users:prerender", "Users:postrender"]
    );
}

#[test]
fn unknown_initial_route_falls_back_to_main() {
    let harness = Harness::boot("#!/nonexistent");

    let current = harness.current();
    assert_eq!(current.matched_route.controller_id, "Home");
    assert!(!current.route_exists);
    assert!(current.should_replace_url);
    assert_eq!(harness.history.current_hash(), "#!/");
    assert!(harness.history.entries().is_empty());
}

#[test]
fn empty_initial_hash_shows_main_route() {
    let harness = Harness::boot("");

    assert_eq!(harness.current().matched_route.controller_id, "Home");
    assert_eq!(harness.history.current_hash(), "#!/");
}

#[test]
fn trailing_separator_is_replaced_on_load() {
    let harness = Harness::boot("#!/generateusers/12/");

    assert_eq!(harness.current().parameter("nbOfUsers"), Some("12"));
    assert_eq!(harness.history.current_hash(), "#!/generateusers/12");
    assert!(harness.history.entries().is_empty());
}

#[test]
fn url_change_runs_a_full_transition() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/generateusers/42"));
    assert!(!harness.router.is_listening());

    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateShown);
    assert!(harness.router.is_busy());
    // nothing is torn down until the gate covers the page
    assert!(harness.log().is_empty());

    assert_eq!(harness.gate.confirm(), Some(GateEvent::Shown));
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateHidden);
    assert_eq!(
        harness.log(),
        vec![
            "Home:before_leave",
            "Users:set_globals(42)",
            "Users:prerender",
            "Users:postrender"
        ]
    );
    assert_eq!(harness.updates.get(), 2);
    assert_eq!(harness.initial_renders.get(), 1);

    harness.settle();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert_eq!(
        harness.gate.requests(),
        vec![GateEvent::Hidden, GateEvent::Shown, GateEvent::Hidden]
    );
    assert_eq!(harness.current().parameter("nbOfUsers"), Some("42"));
    assert_eq!(harness.history.current_hash(), "#!/generateusers/42");
}

#[test]
fn origin_follows_current() {
    let mut harness = Harness::boot("#!/");
    assert!(harness.router.route_state().origin().is_none());

    harness.cx.navigate("/generateusers/1");
    harness.settle();
    let state = harness.router.route_state().clone();
    assert_eq!(state.origin().unwrap().resolved_path, "/");
    assert_eq!(state.current().unwrap().resolved_path, "/generateusers/1");

    harness.history.go_back();
    harness.settle();
    assert_eq!(state.origin().unwrap().resolved_path, "/generateusers/1");
    assert_eq!(state.current().unwrap().resolved_path, "/");
    assert!(harness.history.can_go_forward());
}

#[test]
fn back_to_back_changes_make_one_transition() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/generateusers/1"));
    harness.history.push(String::from("#!/generateusers/2"));
    assert_eq!(harness.router.flush(), 1);

    harness.settle();
    assert_eq!(
        harness.gate.requests(),
        vec![GateEvent::Hidden, GateEvent::Shown, GateEvent::Hidden]
    );
    assert_eq!(harness.current().parameter("nbOfUsers"), Some("2"));
    assert_eq!(harness.updates.get(), 2);
}

#[test]
fn url_changed_during_transition_is_restored() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/generateusers/1"));
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateShown);

    // the user navigates again while the gate is opening
    harness.history.push(String::from("#!/generateusers/7"));
    harness.settle();

    assert_eq!(harness.current().parameter("nbOfUsers"), Some("1"));
    assert_eq!(harness.history.current_hash(), "#!/generateusers/1");
    assert_eq!(
        harness.history.entries(),
        vec!["#!/", "#!/generateusers/1", "#!/generateusers/7"]
    );
    assert_eq!(harness.gate.requests().len(), 3);
}

#[test]
fn changes_while_settling_are_ignored() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/generateusers/1"));
    harness.router.flush();
    harness.gate.confirm();
    harness.router.flush();
    harness.gate.confirm();
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::Settling);

    harness.history.push(String::from("#!/generateusers/5"));
    assert_eq!(harness.router.flush(), 0);

    harness.timer.fire_all();
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert_eq!(harness.current().parameter("nbOfUsers"), Some("1"));

    harness.history.push(String::from("#!/generateusers/6"));
    harness.settle();
    assert_eq!(harness.current().parameter("nbOfUsers"), Some("6"));
}

#[test]
fn controller_redirect_replaces_the_url() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/generateusers/abc"));
    harness.settle();

    let current = harness.current();
    assert_eq!(current.matched_route.controller_id, "Users");
    assert_eq!(current.resolved_path, "/generateusers");
    assert!(current.controller_requested_redirect);
    assert_eq!(harness.history.current_hash(), "#!/generateusers");
    assert_eq!(harness.history.entries(), vec!["#!/"]);
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
}

#[test]
fn controller_redirect_on_initial_route() {
    let mut harness = Harness::new("#!/generateusers/abc");
    harness.router.start();
    harness.cx.provide_controllers(registry(&harness.log));
    harness.router.flush();

    // applied as soon as the first view rendered, before the gate hides
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateHidden);
    assert_eq!(harness.history.current_hash(), "#!/generateusers");

    harness.settle();
    assert_eq!(harness.history.current_hash(), "#!/generateusers");
    assert!(harness.history.entries().is_empty());
}

#[test]
fn unknown_route_is_corrected_without_a_transition() {
    let mut harness = Harness::boot("#!/generateusers/4");

    harness.history.push(String::from("#!/nonexistent"));
    harness.router.flush();

    assert_eq!(harness.router.phase(), RouterPhase::Settling);
    assert!(!harness.router.is_busy());
    assert_eq!(harness.history.current_hash(), "#!/generateusers/4");
    assert_eq!(harness.gate.waiting(), 0);
    assert_eq!(harness.gate.requests(), vec![GateEvent::Hidden]);
    assert!(harness.log().is_empty());

    harness.settle();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert_eq!(harness.updates.get(), 1);
}

#[test]
fn prerender_failure_still_hides_the_gate() {
    let mut harness = Harness::boot("#!/");

    harness.history.push(String::from("#!/broken"));
    harness.settle();

    assert_eq!(harness.log(), vec!["Home:before_leave", "Broken:prerender"]);
    assert_eq!(harness.updates.get(), 1);
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert!(!harness.router.is_busy());
    assert_eq!(harness.current().matched_route.controller_id, "Broken");

    // the router keeps working afterwards
    harness.history.push(String::from("#!/"));
    harness.settle();
    assert_eq!(harness.current().matched_route.controller_id, "Home");
    assert_eq!(harness.updates.get(), 2);
}

#[test]
fn missing_controller_finishes_the_transition() {
    let mut harness = Harness::new("#!/");
    harness.router.start();
    harness
        .cx
        .provide_controllers(ControllerRegistry::new().register_default::<Silent>("Home"));
    harness.settle();
    assert_eq!(harness.router.phase(), RouterPhase::Idle);

    harness.history.push(String::from("#!/generateusers/2"));
    harness.settle();

    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert_eq!(harness.updates.get(), 1);
    assert_eq!(
        harness.gate.requests(),
        vec![GateEvent::Hidden, GateEvent::Shown, GateEvent::Hidden]
    );
}

#[derive(Default)]
struct Silent;

impl PageController for Silent {
    fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}

    fn prerender(&mut self, cx: ControllerContext) {
        cx.view_rendered();
    }
}

/// Renders right away and holds on to its context afterwards.
struct Keeper {
    kept: Rc<RefCell<Option<ControllerContext>>>,
}

impl PageController for Keeper {
    fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}

    fn prerender(&mut self, cx: ControllerContext) {
        cx.view_rendered();
        *self.kept.borrow_mut() = Some(cx);
    }
}

/// Waits for the test to render its view.
struct Slow {
    kept: Rc<RefCell<Option<ControllerContext>>>,
    log: Log,
}

impl PageController for Slow {
    fn set_globals(&mut self, _: RouteParameters, _: Option<String>) {}

    fn prerender(&mut self, cx: ControllerContext) {
        *self.kept.borrow_mut() = Some(cx);
    }

    fn postrender(&mut self) {
        self.log.borrow_mut().push(String::from("Slow:postrender"));
    }
}

#[test]
fn stale_context_cannot_finish_the_next_transition() {
    let home_cx = Rc::new(RefCell::new(None));
    let users_cx = Rc::new(RefCell::new(None));

    let mut harness = Harness::new("#!/");
    let (home, users, log) = (home_cx.clone(), users_cx.clone(), harness.log.clone());
    harness.router.start();
    harness.cx.provide_controllers(
        ControllerRegistry::new()
            .register("Home", move || Box::new(Keeper { kept: home.clone() }))
            .register("Users", move || {
                Box::new(Slow {
                    kept: users.clone(),
                    log: log.clone(),
                })
            }),
    );
    harness.settle();

    harness.history.push(String::from("#!/generateusers/3"));
    harness.router.flush();
    harness.gate.confirm();
    harness.router.flush();
    assert_eq!(harness.router.phase(), RouterPhase::Rendering);

    let stale = home_cx.borrow_mut().take().unwrap();
    assert!(!stale.is_active());
    stale.view_rendered();
    stale.prerender_failed("too late");
    stale.redirect("/");
    harness.router.flush();

    assert_eq!(harness.router.phase(), RouterPhase::Rendering);
    assert!(harness.router.is_busy());
    assert!(harness.log().is_empty());
    assert_eq!(harness.updates.get(), 1);
    assert_eq!(harness.current().resolved_path, "/generateusers/3");
    assert!(!harness.current().controller_requested_redirect);

    let current = users_cx.borrow_mut().take().unwrap();
    assert!(current.is_active());
    current.view_rendered();
    harness.router.flush();

    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateHidden);
    assert_eq!(harness.log(), vec!["Slow:postrender"]);
    assert_eq!(harness.updates.get(), 2);

    // a second signal from the same context counts only once
    current.view_rendered();
    harness.router.flush();
    assert_eq!(harness.updates.get(), 2);
}

#[test]
fn messages_outside_their_phase_are_dropped() {
    let mut harness = Harness::boot("#!/");

    harness.router.handle(RouterMessage::GateShown);
    harness.router.handle(RouterMessage::ViewRendered(0));
    harness.router.handle(RouterMessage::GateHidden);
    harness.router.handle(RouterMessage::Rearm);
    assert_eq!(harness.router.phase(), RouterPhase::Idle);
    assert!(harness.log().is_empty());
    assert_eq!(harness.updates.get(), 1);

    harness.history.push(String::from("#!/generateusers/8"));
    harness.router.flush();

    // a spurious url change while the gate opens does not start a second transition
    harness.router.handle(RouterMessage::UrlChanged);
    harness.router.handle(RouterMessage::ViewRendered(0));
    assert_eq!(harness.router.phase(), RouterPhase::AwaitingGateShown);
    assert_eq!(harness.gate.waiting(), 1);
    assert!(harness.log().is_empty());
}

#[test]
fn plain_hash_syntax() {
    let mut harness = Harness::with_config(
        "#/generateusers/5",
        RouterConfig::default().hash_syntax(HashSyntax::Hash),
    );
    harness.router.start();
    harness.cx.provide_controllers(registry(&harness.log));
    harness.settle();

    assert_eq!(harness.current().parameter("nbOfUsers"), Some("5"));

    harness.cx.navigate("/");
    assert_eq!(harness.history.current_hash(), "#/");
    harness.settle();
    assert_eq!(harness.current().matched_route.controller_id, "Home");
}

#[test]
fn custom_settle_delay() {
    let mut harness = Harness::with_config(
        "#!/",
        RouterConfig::default().settle_delay(Duration::from_millis(250)),
    );
    harness.router.start();
    harness.cx.provide_controllers(registry(&harness.log));
    harness.router.flush();
    harness.gate.confirm();
    harness.router.flush();

    assert_eq!(harness.timer.pending_delays(), vec![Duration::from_millis(250)]);
}
