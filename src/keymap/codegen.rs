//! C source emitted into the keymap: the dance callbacks and the table entry
//! that registers them.

use crate::config::DanceConfig;
use crate::keymap::gesture::{Gesture, KeyAction};
use std::fmt;

const CALLBACK_PARAMS: &str = "(tap_dance_state_t *state, void *user_data)";

/// Prototypes and definitions of the three dance callbacks.
///
/// Starts with a newline and ends with a blank line so it can be dropped
/// directly in front of the actions table.
pub fn behavior_block(config: &DanceConfig) -> String {
    BehaviorBlock(config).to_string()
}

struct BehaviorBlock<'a>(&'a DanceConfig);

impl fmt::Display for BehaviorBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        let on_each = config.on_each_tap_fn();
        let finished = config.finished_fn();
        let reset = config.reset_fn();
        let slot = format!("{}[{}]", config.state_array, config.index);
        let gesture = &config.gesture;

        writeln!(f)?;
        for name in [&on_each, &finished, &reset] {
            writeln!(f, "void {name}{CALLBACK_PARAMS};")?;
        }
        writeln!(f)?;

        writeln!(f, "void {on_each}{CALLBACK_PARAMS} {{")?;
        writeln!(f, "}}\n")?;

        writeln!(f, "void {finished}{CALLBACK_PARAMS} {{")?;
        writeln!(f, "    {slot}.step = dance_step(state);")?;
        writeln!(f, "    switch ({slot}.step) {{")?;
        for g in Gesture::ALL {
            write_case(f, g, &g.on_finished(gesture))?;
        }
        writeln!(f, "    }}\n}}\n")?;

        writeln!(f, "void {reset}{CALLBACK_PARAMS} {{")?;
        writeln!(f, "    wait_ms({});", gesture.reset_delay_ms)?;
        writeln!(f, "    switch ({slot}.step) {{")?;
        for g in Gesture::ALL {
            let actions = g.on_reset(gesture);
            if !actions.is_empty() {
                write_case(f, g, &actions)?;
            }
        }
        writeln!(f, "    }}")?;
        writeln!(f, "    {slot}.step = 0;")?;
        writeln!(f, "}}\n")
    }
}

fn write_case(f: &mut fmt::Formatter<'_>, gesture: Gesture, actions: &[KeyAction]) -> fmt::Result {
    write!(f, "        case {}:", gesture.c_label())?;
    for action in actions {
        write!(f, " {action}")?;
    }
    writeln!(f, " break;")
}

/// Initializer entry for the actions table, including its trailing comma.
pub fn action_entry(config: &DanceConfig) -> String {
    format!(
        "[{}] = ACTION_TAP_DANCE_FN_ADVANCED({}, {}, {}),",
        config.dance_name(),
        config.on_each_tap_fn(),
        config.finished_fn(),
        config.reset_fn()
    )
}
