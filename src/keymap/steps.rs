//! The five ordered keymap patch steps.
//!
//! Each step inspects the current text and plans at most one [`Edit`]. A step
//! whose marker is missing is skipped; a step whose change is already present
//! plans nothing. Steps are order-dependent: the patcher applies each plan
//! before the next step looks at the text.

use crate::config::DanceConfig;
use crate::edit::Edit;
use crate::keymap::codegen;
use crate::keymap::locate::{BraceBlock, Locator};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    EnumMember,
    StateArray,
    BehaviorBlock,
    ActionEntry,
    LayoutKey,
}

impl Step {
    /// Application order.
    pub const ALL: [Step; 5] = [
        Step::EnumMember,
        Step::StateArray,
        Step::BehaviorBlock,
        Step::ActionEntry,
        Step::LayoutKey,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::EnumMember => "enum-member",
            Step::StateArray => "state-array",
            Step::BehaviorBlock => "behavior-block",
            Step::ActionEntry => "action-entry",
            Step::LayoutKey => "layout-key",
        }
    }

    pub fn plan(self, content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
        match self {
            Step::EnumMember => plan_enum_member(content, config, locator),
            Step::StateArray => plan_state_array(content, config, locator),
            Step::BehaviorBlock => plan_behavior_block(content, config, locator),
            Step::ActionEntry => plan_action_entry(content, config, locator),
            Step::LayoutKey => plan_layout_key(content, config, locator),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of planning one step against the current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPlan {
    Edit { edit: Edit, message: String },
    AlreadyApplied { message: String },
    Skipped { reason: String },
}

fn skipped(reason: impl Into<String>) -> StepPlan {
    StepPlan::Skipped {
        reason: reason.into(),
    }
}

/// Replace the whitespace between a block's last item and its `};` with
/// `item` on its own line, adding the missing separator.
///
/// A block that already ends in `,` keeps a trailing comma after `item`.
fn append_to_block(content: &str, block: BraceBlock, indent: &str, item: &str) -> Edit {
    let last = block.last_char(content);
    let separator = match last {
        Some(',') | Some('{') | None => "",
        Some(_) => ",",
    };
    let trailing = if last == Some(',') && !item.ends_with(',') {
        ","
    } else {
        ""
    };
    let new_text = format!("{separator}\n{indent}{item}{trailing}\n");
    Edit::new(
        block.content_end,
        block.close,
        new_text,
        &content[block.content_end..block.close],
    )
}

fn plan_enum_member(content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
    let name = config.dance_name();
    if content.contains(&name) {
        return StepPlan::AlreadyApplied {
            message: format!("{name} already present"),
        };
    }
    let Some(block) = locator.enum_block(content) else {
        return skipped(format!("enum {} not found", config.enum_name));
    };

    StepPlan::Edit {
        edit: append_to_block(content, block, "  ", &name),
        message: format!("Added {name} to {} enum", config.enum_name),
    }
}

fn plan_state_array(content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
    let Some((literal, current)) = locator.state_array_size(content) else {
        return skipped(format!(
            "static {} {}[N]; not found",
            config.state_type, config.state_array
        ));
    };

    // Rewritten even when large enough; the edit is then a no-op
    let size = current.max(config.required_state_slots());
    StepPlan::Edit {
        edit: Edit::new(
            literal.start,
            literal.end,
            size.to_string(),
            &content[literal.clone()],
        ),
        message: format!("Updated {} array to size {size}", config.state_array),
    }
}

fn plan_behavior_block(content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
    let label = format!("dance_{}", config.index);
    if content.contains(&format!("void {}", config.on_each_tap_fn())) {
        return StepPlan::AlreadyApplied {
            message: format!("{label} functions already present"),
        };
    }
    let Some(offset) = locator.actions_table_start(content) else {
        return skipped(format!("{} declaration not found", config.actions_table));
    };

    StepPlan::Edit {
        edit: Edit::insert(offset, codegen::behavior_block(config)),
        message: format!("Injected {label} functions"),
    }
}

fn plan_action_entry(content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
    let entry = codegen::action_entry(config);
    let label = format!("dance_{}", config.index);
    if content.contains(&entry) {
        return StepPlan::AlreadyApplied {
            message: format!("{label} already in {}", config.actions_table),
        };
    }
    let Some(block) = locator.actions_table(content) else {
        return skipped(format!("{} initializer not found", config.actions_table));
    };

    StepPlan::Edit {
        edit: append_to_block(content, block, "        ", &entry),
        message: format!("Added {label} to {}", config.actions_table),
    }
}

fn plan_layout_key(content: &str, config: &DanceConfig, locator: &Locator) -> StepPlan {
    let Some(range) = locator.layout_block(content) else {
        return skipped(format!(
            "[{}] = {}(...) not found",
            config.layer, config.layout_macro
        ));
    };
    let block = &content[range.clone()];
    let keycode = config.layout_keycode();

    // Without this a second run would consume the next-to-last target key
    if block.contains(&keycode) {
        return StepPlan::AlreadyApplied {
            message: format!("Layer {} already maps {keycode}", config.layer),
        };
    }
    let Some(pos) = block.rfind(&config.target_key) else {
        return skipped(format!(
            "{} not found in layer {}",
            config.target_key, config.layer
        ));
    };

    let start = range.start + pos;
    let end = start + config.target_key.len();
    StepPlan::Edit {
        edit: Edit::new(start, end, keycode.clone(), &config.target_key),
        message: format!(
            "Replaced {} key with {keycode} in Layer {}",
            config.target_key, config.layer
        ),
    }
}
