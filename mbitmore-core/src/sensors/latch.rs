//! Interrupt latches
//!
//! A latch holds at most one value. Writers overwrite it, the notify cycle
//! drains it. Each access runs inside a critical section, so interrupt
//! handlers may write while the main loop reads.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use mbitmore_protocol::{
    ActionEventReport, ButtonEvent, ButtonId, Gesture, PinEventKind, PinEventReport,
};

/// Single-slot, latest-wins cell
pub struct Latch<T: Copy> {
    slot: Mutex<CriticalSectionRawMutex, Cell<Option<T>>>,
}

impl<T: Copy> Latch<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Store `value`, replacing anything not yet taken
    pub fn set(&self, value: T) {
        self.slot.lock(|slot| slot.set(Some(value)));
    }

    /// Drain the latch
    pub fn take(&self) -> Option<T> {
        self.slot.lock(|slot| slot.take())
    }

    /// Look at the latched value without draining it
    pub fn peek(&self) -> Option<T> {
        self.slot.lock(|slot| slot.get())
    }

    pub fn clear(&self) {
        self.slot.lock(|slot| slot.set(None));
    }
}

impl<T: Copy> Default for Latch<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every latch written from interrupt context
///
/// Meant to live in a `static` so handlers can reach it:
///
/// ```ignore
/// static LATCHES: EventLatches = EventLatches::new();
/// ```
pub struct EventLatches {
    pin_event: Latch<PinEventReport>,
    buttons: [Latch<(ButtonEvent, u32)>; 3],
    gesture: Latch<(Gesture, u32)>,
}

impl EventLatches {
    pub const fn new() -> Self {
        Self {
            pin_event: Latch::new(),
            buttons: [Latch::new(), Latch::new(), Latch::new()],
            gesture: Latch::new(),
        }
    }

    /// Record an event fired on a listening pin
    ///
    /// Only the most recent pin event survives until the next cycle.
    pub fn pin_event(&self, pin: u8, kind: PinEventKind, timestamp_ms: u32) {
        self.pin_event.set(PinEventReport {
            pin,
            kind,
            timestamp_ms,
        });
    }

    /// Record a button or logo event
    pub fn button_event(&self, button: ButtonId, event: ButtonEvent, timestamp_ms: u32) {
        self.buttons[button.index()].set((event, timestamp_ms));
    }

    /// Record a gesture
    pub fn gesture(&self, gesture: Gesture, timestamp_ms: u32) {
        self.gesture.set((gesture, timestamp_ms));
    }

    pub fn take_pin_event(&self) -> Option<PinEventReport> {
        self.pin_event.take()
    }

    /// Drain one action event
    ///
    /// Buttons A, B and the logo come before the gesture; the rest stay
    /// latched for later cycles.
    pub fn take_action_event(&self) -> Option<ActionEventReport> {
        for button in ButtonId::ALL {
            if let Some((event, timestamp_ms)) = self.buttons[button.index()].take() {
                return Some(ActionEventReport::Button {
                    button,
                    event,
                    timestamp_ms,
                });
            }
        }
        self.gesture
            .take()
            .map(|(gesture, timestamp_ms)| ActionEventReport::Gesture {
                gesture,
                timestamp_ms,
            })
    }

    /// Returns true if any action event is waiting
    pub fn has_action_event(&self) -> bool {
        self.buttons.iter().any(|latch| latch.peek().is_some()) || self.gesture.peek().is_some()
    }

    pub fn clear(&self) {
        self.pin_event.clear();
        for latch in &self.buttons {
            latch.clear();
        }
        self.gesture.clear();
    }
}

impl Default for EventLatches {
    fn default() -> Self {
        Self::new()
    }
}
