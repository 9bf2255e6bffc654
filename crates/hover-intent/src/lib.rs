//! Hover Intent
//!
//! Open/close state machine for a row of dropdown navigation items.
//! Hover leaves are delayed through a cancellable close timer so the pointer
//! can cross the gap between a menu label and its submenu without collapsing it.
//!
//! The machine never touches the DOM or a clock. Every operation returns the
//! [`Command`]s the caller must apply: toggle an item's open class, start a
//! timer, or cancel one. When a timer started by [`Command::Schedule`] fires,
//! the caller reports it back through [`DropdownMenu::timer_fired`] with the
//! token it was given.

/// Index of a navigation item, in document order
pub type ItemId = usize;

/// Observable state of a single item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
    /// Open, with a hover-intent close scheduled
    PendingClose,
}

/// Input model chosen once from the viewport width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Desktop: pointer enter/leave drives the menu, clicks toggle
    Hover,
    /// Mobile: only trigger clicks toggle, no pending-close state
    Click,
}

impl Mode {
    /// Widths at or below the breakpoint use click mode
    pub fn for_viewport(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            Mode::Click
        } else {
            Mode::Hover
        }
    }
}

/// Where the pointer went when it left an item's trigger or submenu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Still inside the same item's trigger or submenu
    WithinItem,
    /// Anywhere else, including leaving the window
    Elsewhere,
}

/// Why a timer was scheduled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Close unless the pointer is back over the item when it fires
    HoverIntent,
    /// Unconditional close after a submenu link was activated
    Collapse,
}

/// Identifies one scheduled timer. Tokens are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Side effect requested by the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Mark the item open
    Open(ItemId),
    /// Mark the item closed
    Close(ItemId),
    /// Start a timer for the item, replacing any timer it already owns
    Schedule {
        item: ItemId,
        token: TimerToken,
        kind: TimerKind,
        delay_ms: u32,
    },
    /// Drop the item's outstanding timer
    Cancel(ItemId),
}

/// Timer delays in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delays {
    pub close_ms: u32,
    pub collapse_ms: u32,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            close_ms: 400,
            collapse_ms: 400,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: TimerToken,
    kind: TimerKind,
}

#[derive(Clone, Copy, Debug, Default)]
struct Item {
    open: bool,
    pending: Option<Pending>,
    /// Opened by a pointer entry that no click has followed yet
    opened_by_hover: bool,
}

impl Item {
    fn state(&self) -> MenuState {
        match (self.open, self.pending) {
            (false, _) => MenuState::Closed,
            (true, Some(Pending { kind: TimerKind::HoverIntent, .. })) => MenuState::PendingClose,
            (true, _) => MenuState::Open,
        }
    }
}

/// Sibling dropdown items sharing the at-most-one-open rule
#[derive(Debug)]
pub struct DropdownMenu {
    items: Vec<Item>,
    mode: Mode,
    delays: Delays,
    next_token: u64,
}

impl DropdownMenu {
    pub fn new(len: usize, mode: Mode, delays: Delays) -> Self {
        Self {
            items: vec![Item::default(); len],
            mode,
            delays,
            next_token: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// State of `id`, or `None` for an unknown item
    pub fn state(&self, id: ItemId) -> Option<MenuState> {
        self.items.get(id).map(Item::state)
    }

    /// The open item, if any
    pub fn open_item(&self) -> Option<ItemId> {
        self.items.iter().position(|item| item.open)
    }

    /// Pointer entered the item's trigger or its submenu.
    ///
    /// Cancels a pending hover-intent close. A scheduled collapse is left alone.
    pub fn pointer_enter(&mut self, id: ItemId) -> Vec<Command> {
        if self.mode == Mode::Click {
            return Vec::new();
        }
        let was_open = self.items.get(id).is_some_and(|item| item.open);
        let out = self.keep_open(id);
        if let Some(item) = self.items.get_mut(id).filter(|_| !was_open) {
            item.opened_by_hover = item.open;
        }
        out
    }

    /// Pointer left the item's trigger or its submenu.
    pub fn pointer_leave(&mut self, id: ItemId, destination: Destination) -> Vec<Command> {
        let mut out = Vec::new();
        if self.mode == Mode::Click || destination == Destination::WithinItem {
            return out;
        }
        let Some(item) = self.items.get(id) else {
            return out;
        };
        if !item.open {
            return out;
        }
        if let Some(Pending { kind: TimerKind::Collapse, .. }) = item.pending {
            return out;
        }
        let delay_ms = self.delays.close_ms;
        self.schedule(id, TimerKind::HoverIntent, delay_ms, &mut out);
        out
    }

    /// A timer started by [`Command::Schedule`] fired.
    ///
    /// `pointer_inside` reports whether the pointer is over the trigger or the
    /// submenu right now. Stale tokens are ignored. Never emits `Schedule` or
    /// `Cancel`, so the caller may run this from inside the timer callback.
    pub fn timer_fired(&mut self, id: ItemId, token: TimerToken, pointer_inside: bool) -> Vec<Command> {
        let mut out = Vec::new();
        let Some(item) = self.items.get_mut(id) else {
            return out;
        };
        let Some(pending) = item.pending.filter(|p| p.token == token) else {
            log::trace!("[hover-intent] stale timer {token:?} for item {id}");
            return out;
        };
        item.pending = None;
        let close = match pending.kind {
            TimerKind::HoverIntent => !pointer_inside,
            TimerKind::Collapse => true,
        };
        if close && item.open {
            item.open = false;
            item.opened_by_hover = false;
            out.push(Command::Close(id));
        }
        out
    }

    /// Trigger link clicked: toggles the item, closing its siblings on open.
    ///
    /// A tap emulates `mouseenter` before `click`. The first click after the
    /// entry that opened the item is absorbed so the tap leaves it open.
    pub fn trigger_clicked(&mut self, id: ItemId) -> Vec<Command> {
        let mut out = Vec::new();
        let Some(item) = self.items.get_mut(id) else {
            return out;
        };
        if std::mem::take(&mut item.opened_by_hover) && item.open {
            return out;
        }
        if item.open {
            self.close(id, &mut out);
        } else {
            self.close_others(id, &mut out);
            self.open(id, &mut out);
        }
        out
    }

    /// A submenu link is pressed or hovered: the item must stay open.
    pub fn keep_open(&mut self, id: ItemId) -> Vec<Command> {
        let mut out = Vec::new();
        let Some(item) = self.items.get_mut(id) else {
            return out;
        };
        if let Some(Pending { kind: TimerKind::HoverIntent, .. }) = item.pending {
            item.pending = None;
            out.push(Command::Cancel(id));
        }
        if !self.items[id].open {
            self.close_others(id, &mut out);
            self.open(id, &mut out);
        }
        out
    }

    /// A submenu link was activated: collapse the item after a short delay.
    pub fn link_activated(&mut self, id: ItemId) -> Vec<Command> {
        let mut out = Vec::new();
        if !matches!(self.items.get(id), Some(item) if item.open) {
            return out;
        }
        let delay_ms = self.delays.collapse_ms;
        self.schedule(id, TimerKind::Collapse, delay_ms, &mut out);
        out
    }

    /// Close every item and cancel every timer.
    pub fn close_all(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        for id in 0..self.items.len() {
            self.close(id, &mut out);
        }
        out
    }

    fn open(&mut self, id: ItemId, out: &mut Vec<Command>) {
        let item = &mut self.items[id];
        if !item.open {
            item.open = true;
            out.push(Command::Open(id));
        }
    }

    fn close(&mut self, id: ItemId, out: &mut Vec<Command>) {
        let item = &mut self.items[id];
        item.opened_by_hover = false;
        if item.pending.take().is_some() {
            out.push(Command::Cancel(id));
        }
        if item.open {
            item.open = false;
            out.push(Command::Close(id));
        }
    }

    fn close_others(&mut self, keep: ItemId, out: &mut Vec<Command>) {
        for id in 0..self.items.len() {
            if id != keep {
                self.close(id, out);
            }
        }
    }

    fn schedule(&mut self, id: ItemId, kind: TimerKind, delay_ms: u32, out: &mut Vec<Command>) {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let item = &mut self.items[id];
        if item.pending.replace(Pending { token, kind }).is_some() {
            out.push(Command::Cancel(id));
        }
        out.push(Command::Schedule {
            item: id,
            token,
            kind,
            delay_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn hover_menu(len: usize) -> DropdownMenu {
        DropdownMenu::new(len, Mode::Hover, Delays::default())
    }

    fn scheduled(commands: &[Command]) -> Option<TimerToken> {
        commands.iter().find_map(|c| match c {
            Command::Schedule { token, .. } => Some(*token),
            _ => None,
        })
    }

    #[test]
    fn test_mode_for_viewport() {
        assert_eq!(Mode::for_viewport(1024.0, 768.0), Mode::Hover);
        assert_eq!(Mode::for_viewport(768.0, 768.0), Mode::Click);
        assert_eq!(Mode::for_viewport(500.0, 768.0), Mode::Click);
    }

    #[test]
    fn test_enter_opens_and_closes_siblings() {
        let mut menu = hover_menu(3);
        assert_eq!(menu.pointer_enter(0), vec![Command::Open(0)]);
        assert_eq!(menu.pointer_enter(2), vec![Command::Close(0), Command::Open(2)]);
        assert_eq!(menu.open_item(), Some(2));
        assert_eq!(menu.state(0), Some(MenuState::Closed));
    }

    #[test]
    fn test_leave_within_item_does_not_schedule() {
        let mut menu = hover_menu(2);
        menu.pointer_enter(0);
        assert!(menu.pointer_leave(0, Destination::WithinItem).is_empty());
        assert_eq!(menu.state(0), Some(MenuState::Open));
    }

    #[test]
    fn test_leave_schedules_hover_intent_close() {
        let mut menu = hover_menu(2);
        menu.pointer_enter(1);
        let commands = menu.pointer_leave(1, Destination::Elsewhere);
        assert_eq!(
            commands,
            vec![Command::Schedule {
                item: 1,
                token: TimerToken(0),
                kind: TimerKind::HoverIntent,
                delay_ms: 400,
            }]
        );
        assert_eq!(menu.state(1), Some(MenuState::PendingClose));
    }

    #[test]
    fn test_reenter_cancels_pending_close() {
        let mut menu = hover_menu(1);
        menu.pointer_enter(0);
        let token = scheduled(&menu.pointer_leave(0, Destination::Elsewhere)).unwrap();
        assert_eq!(menu.pointer_enter(0), vec![Command::Cancel(0)]);
        assert_eq!(menu.state(0), Some(MenuState::Open));

        // The old timer still fires in a racy host; it must not close the menu.
        assert!(menu.timer_fired(0, token, false).is_empty());
        assert_eq!(menu.state(0), Some(MenuState::Open));
    }

    #[test]
    fn test_timer_rechecks_pointer_before_closing() {
        let mut menu = hover_menu(1);
        menu.pointer_enter(0);
        let token = scheduled(&menu.pointer_leave(0, Destination::Elsewhere)).unwrap();
        assert!(menu.timer_fired(0, token, true).is_empty());
        assert_eq!(menu.state(0), Some(MenuState::Open));

        let token = scheduled(&menu.pointer_leave(0, Destination::Elsewhere)).unwrap();
        assert_eq!(menu.timer_fired(0, token, false), vec![Command::Close(0)]);
        assert_eq!(menu.state(0), Some(MenuState::Closed));
    }

    #[test]
    fn test_second_leave_replaces_timer() {
        let mut menu = hover_menu(1);
        menu.pointer_enter(0);
        let first = scheduled(&menu.pointer_leave(0, Destination::Elsewhere)).unwrap();
        let commands = menu.pointer_leave(0, Destination::Elsewhere);
        assert_eq!(commands[0], Command::Cancel(0));
        let second = scheduled(&commands).unwrap();
        assert_ne!(first, second);
        assert!(menu.timer_fired(0, first, false).is_empty());
        assert_eq!(menu.timer_fired(0, second, false), vec![Command::Close(0)]);
    }

    #[test]
    fn test_click_mode_ignores_hover() {
        let mut menu = DropdownMenu::new(2, Mode::Click, Delays::default());
        assert!(menu.pointer_enter(0).is_empty());
        assert_eq!(menu.trigger_clicked(0), vec![Command::Open(0)]);
        assert!(menu.pointer_leave(0, Destination::Elsewhere).is_empty());
        assert_eq!(menu.trigger_clicked(1), vec![Command::Close(0), Command::Open(1)]);
        assert_eq!(menu.trigger_clicked(1), vec![Command::Close(1)]);
        assert_eq!(menu.open_item(), None);
    }

    #[test]
    fn test_close_all_cancels_timers() {
        let mut menu = hover_menu(2);
        menu.pointer_enter(1);
        let token = scheduled(&menu.pointer_leave(1, Destination::Elsewhere)).unwrap();
        assert_eq!(menu.close_all(), vec![Command::Cancel(1), Command::Close(1)]);
        assert!(menu.timer_fired(1, token, false).is_empty());
        assert!(menu.close_all().is_empty());
    }

    #[test]
    fn test_link_activation_collapses_even_when_hovered() {
        let mut menu = hover_menu(1);
        menu.pointer_enter(0);
        let commands = menu.link_activated(0);
        let token = scheduled(&commands).unwrap();
        assert_eq!(menu.state(0), Some(MenuState::Open));

        // Hovering the next link keeps the collapse scheduled.
        assert!(menu.keep_open(0).is_empty());
        assert!(menu.pointer_leave(0, Destination::Elsewhere).is_empty());
        assert_eq!(menu.timer_fired(0, token, true), vec![Command::Close(0)]);
    }

    #[test]
    fn test_keep_open_reopens_closed_item() {
        let mut menu = hover_menu(2);
        menu.pointer_enter(0);
        assert_eq!(menu.keep_open(1), vec![Command::Close(0), Command::Open(1)]);
    }

    #[test]
    fn test_tap_on_trigger_stays_open() {
        let mut menu = hover_menu(2);
        assert_eq!(menu.pointer_enter(0), vec![Command::Open(0)]);
        assert!(menu.trigger_clicked(0).is_empty());
        assert_eq!(menu.state(0), Some(MenuState::Open));

        // A second tap toggles it closed.
        assert_eq!(menu.trigger_clicked(0), vec![Command::Close(0)]);
        assert_eq!(menu.state(0), Some(MenuState::Closed));
    }

    #[test]
    fn test_click_after_hover_reentry_still_toggles() {
        let mut menu = hover_menu(1);
        menu.pointer_enter(0);
        menu.trigger_clicked(0);
        // Entering an already open item does not arm the tap guard again.
        menu.pointer_enter(0);
        assert_eq!(menu.trigger_clicked(0), vec![Command::Close(0)]);

        // After a close, the next hover-open arms it again.
        assert_eq!(menu.pointer_enter(0), vec![Command::Open(0)]);
        assert!(menu.trigger_clicked(0).is_empty());
    }

    #[test]
    fn test_unknown_item_is_inert() {
        let mut menu = hover_menu(1);
        assert!(menu.pointer_enter(7).is_empty());
        assert!(menu.trigger_clicked(7).is_empty());
        assert!(menu.link_activated(7).is_empty());
        assert!(menu.timer_fired(7, TimerToken(0), false).is_empty());
        assert_eq!(menu.state(7), None);
    }

    #[derive(Clone, Debug)]
    enum Event {
        Enter(usize),
        Leave(usize, bool),
        Fire(usize, usize, bool),
        Click(usize),
        KeepOpen(usize),
        Activate(usize),
        CloseAll,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0..4usize).prop_map(Event::Enter),
            (0..4usize, any::<bool>()).prop_map(|(i, inside)| Event::Leave(i, inside)),
            (0..4usize, 0..16usize, any::<bool>()).prop_map(|(i, t, h)| Event::Fire(i, t, h)),
            (0..4usize).prop_map(Event::Click),
            (0..4usize).prop_map(Event::KeepOpen),
            (0..4usize).prop_map(Event::Activate),
            Just(Event::CloseAll),
        ]
    }

    proptest! {
        #[test]
        fn prop_at_most_one_open_and_commands_track_state(
            hover in any::<bool>(),
            events in prop::collection::vec(event(), 1..64),
        ) {
            let mode = if hover { Mode::Hover } else { Mode::Click };
            let mut menu = DropdownMenu::new(3, mode, Delays::default());
            let mut classes = [false; 3];
            let mut live: [Option<TimerToken>; 3] = [None; 3];
            let mut issued: Vec<(usize, TimerToken)> = Vec::new();

            for event in events {
                let commands = match event {
                    Event::Enter(i) => menu.pointer_enter(i),
                    Event::Leave(i, inside) => {
                        let dest = if inside { Destination::WithinItem } else { Destination::Elsewhere };
                        menu.pointer_leave(i, dest)
                    }
                    Event::Fire(i, t, hovering) => {
                        let (item, token) = issued.get(t).copied().unwrap_or((i, TimerToken(u64::MAX)));
                        let commands = menu.timer_fired(item, token, hovering);
                        if live.get(item).copied().flatten() != Some(token) {
                            prop_assert!(commands.is_empty());
                        } else {
                            live[item] = None;
                        }
                        commands
                    }
                    Event::Click(i) => menu.trigger_clicked(i),
                    Event::KeepOpen(i) => menu.keep_open(i),
                    Event::Activate(i) => menu.link_activated(i),
                    Event::CloseAll => menu.close_all(),
                };

                for command in commands {
                    match command {
                        Command::Open(i) => classes[i] = true,
                        Command::Close(i) => classes[i] = false,
                        Command::Schedule { item, token, .. } => {
                            live[item] = Some(token);
                            issued.push((item, token));
                        }
                        Command::Cancel(i) => live[i] = None,
                    }
                }

                prop_assert!(classes.iter().filter(|open| **open).count() <= 1);
                for (i, open) in classes.iter().enumerate() {
                    prop_assert_eq!(*open, menu.state(i) != Some(MenuState::Closed));
                }
            }
        }
    }
}
