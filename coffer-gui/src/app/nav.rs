use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::app::{
    bus::{Event, EventBus},
    error::Error,
};

/// Host handle for a clickable tab control.
///
/// The host owns the widget (a DOM node, a terminal row, ...); the
/// navigation only marks it active and wires the activation trigger the
/// host fires on click.
pub trait TabControl: Send {
    fn set_active(&mut self, active: bool);
    fn connect_trigger(&mut self, trigger: Trigger);
}

/// Host handle for the content region associated with a tab.
pub trait PaneContent: Send {
    fn set_visible(&mut self, visible: bool);
}

pub type Trigger = Box<dyn Fn() + Send + Sync>;

struct TabPane {
    key: String,
    control: Box<dyn TabControl>,
    content: Box<dyn PaneContent>,
    active: bool,
}

/// Single-selection state machine over the registered (tab, pane) pairs.
///
/// At most one pane is active at any time, and exactly one after any
/// successful [`Navigation::activate`]. Clones share the same registry.
#[derive(Clone)]
pub struct Navigation {
    bus: EventBus,
    panes: Arc<Mutex<Vec<TabPane>>>,
}

impl Navigation {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            panes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a (tab, pane) pair under `key` and wires the control's
    /// activation trigger. The pane is not activated.
    pub fn register_pane(
        &self,
        mut control: Box<dyn TabControl>,
        content: Box<dyn PaneContent>,
        key: &str,
    ) {
        let nav = self.clone();
        let k = key.to_string();
        control.connect_trigger(Box::new(move || {
            if let Err(e) = nav.activate(&k) {
                error!("tab trigger for '{}': {}", k, e);
            }
        }));
        let mut panes = self.panes.lock().unwrap();
        panes.push(TabPane {
            key: key.to_string(),
            control,
            content,
            active: false,
        });
    }

    /// Makes the pane registered under `key` the only visible one and
    /// publishes [`Event::TabChanged`]. Re-activating the current pane
    /// publishes again but does not touch the host surfaces.
    pub fn activate(&self, key: &str) -> Result<(), Error> {
        {
            let mut panes = self.panes.lock().unwrap();
            if !panes.iter().any(|p| p.key == key) {
                return Err(Error::UnknownPane(key.to_string()));
            }
            let already_active = panes.iter().any(|p| p.key == key && p.active);
            if !already_active {
                for pane in panes.iter_mut() {
                    if pane.active {
                        pane.active = false;
                        pane.control.set_active(false);
                        pane.content.set_visible(false);
                    }
                }
                for pane in panes.iter_mut() {
                    if pane.key == key {
                        pane.active = true;
                        pane.control.set_active(true);
                        pane.content.set_visible(true);
                    }
                }
                info!("pane '{}' activated", key);
            }
        }
        self.bus.publish(Event::TabChanged);
        Ok(())
    }

    /// Key of the currently active pane, if any.
    pub fn active(&self) -> Option<String> {
        let panes = self.panes.lock().unwrap();
        panes.iter().find(|p| p.active).map(|p| p.key.clone())
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> Vec<String> {
        let panes = self.panes.lock().unwrap();
        panes.iter().map(|p| p.key.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bus::Topic;

    #[derive(Clone, Default)]
    struct Recorder {
        active: Arc<Mutex<Option<bool>>>,
        visible: Arc<Mutex<Option<bool>>>,
        flips: Arc<Mutex<usize>>,
        trigger: Arc<Mutex<Option<Trigger>>>,
    }

    struct RecorderControl(Recorder);
    struct RecorderContent(Recorder);

    impl TabControl for RecorderControl {
        fn set_active(&mut self, active: bool) {
            *self.0.active.lock().unwrap() = Some(active);
        }
        fn connect_trigger(&mut self, trigger: Trigger) {
            *self.0.trigger.lock().unwrap() = Some(trigger);
        }
    }

    impl PaneContent for RecorderContent {
        fn set_visible(&mut self, visible: bool) {
            *self.0.visible.lock().unwrap() = Some(visible);
            *self.0.flips.lock().unwrap() += 1;
        }
    }

    fn register(nav: &Navigation, key: &str) -> Recorder {
        let recorder = Recorder::default();
        nav.register_pane(
            Box::new(RecorderControl(recorder.clone())),
            Box::new(RecorderContent(recorder.clone())),
            key,
        );
        recorder
    }

    #[test]
    fn exactly_one_pane_active_after_each_activation() {
        let nav = Navigation::new(EventBus::new());
        let receive = register(&nav, "receive");
        let send = register(&nav, "send");
        let backup = register(&nav, "backup");

        assert_eq!(nav.active(), None);
        for key in ["receive", "send", "backup", "send", "receive"].iter() {
            nav.activate(key).unwrap();
            assert_eq!(nav.active(), Some(key.to_string()));
        }
        assert_eq!(*receive.active.lock().unwrap(), Some(true));
        assert_eq!(*send.active.lock().unwrap(), Some(false));
        assert_eq!(*backup.active.lock().unwrap(), Some(false));
        assert_eq!(*receive.visible.lock().unwrap(), Some(true));
        assert_eq!(*send.visible.lock().unwrap(), Some(false));
    }

    #[test]
    fn unknown_key_fails_and_leaves_state() {
        let nav = Navigation::new(EventBus::new());
        register(&nav, "receive");

        let err = nav.activate("nonexistent").unwrap_err();
        assert!(matches!(err, Error::UnknownPane(ref k) if k == "nonexistent"));
        assert_eq!(nav.active(), None);

        nav.activate("receive").unwrap();
        assert!(nav.activate("nonexistent").is_err());
        assert_eq!(nav.active(), Some("receive".to_string()));
    }

    #[test]
    fn activate_on_empty_registry_fails() {
        let nav = Navigation::new(EventBus::new());
        assert!(matches!(
            nav.activate("receive"),
            Err(Error::UnknownPane(_))
        ));
    }

    #[test]
    fn reactivation_does_not_flicker_but_still_publishes() {
        let bus = EventBus::new();
        let published = Arc::new(Mutex::new(0));
        {
            let published = published.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                *published.lock().unwrap() += 1;
            });
        }
        let nav = Navigation::new(bus);
        let receive = register(&nav, "receive");

        nav.activate("receive").unwrap();
        let flips = *receive.flips.lock().unwrap();
        nav.activate("receive").unwrap();
        assert_eq!(*receive.flips.lock().unwrap(), flips);
        assert_eq!(nav.active(), Some("receive".to_string()));
        assert_eq!(*published.lock().unwrap(), 2);
    }

    #[test]
    fn trigger_activates_its_pane() {
        let nav = Navigation::new(EventBus::new());
        let receive = register(&nav, "receive");
        register(&nav, "send");

        nav.activate("send").unwrap();
        let trigger = receive.trigger.lock().unwrap().take().unwrap();
        trigger();
        assert_eq!(nav.active(), Some("receive".to_string()));
    }
}
