//! Random battle-menu generation.
//!
//! Each draw picks a category on a 0..=100 roll: most rolls take a verb,
//! a smaller band takes a noun, and the remainder produce a blank slot when
//! the game allows them. Rejected draws simply roll again; a draw budget
//! turns hopeless layouts into an error instead of an endless loop.

use log::{debug, trace};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::ConfigError;
use crate::game::layout::LayoutSpec;
use crate::game::words::{WordBank, apply_casing, normalize};

/// Command forced into the first slot when a noun is rolled before
/// anything else, so the menu always leads with a usable attack.
pub const FIRST_NOUN_COMMAND: &str = "fight";
/// Fills the reserved last slot.
pub const ITEM_COMMAND: &str = "item";

pub const DEFAULT_MAX_DRAWS: usize = 10_000;

const ROLL_MAX: u32 = 100;
const VERB_BELOW: u32 = 82;
const NOUN_BELOW: u32 = 93;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Verb,
    Noun,
    Blank,
}

#[inline(always)]
const fn category_for_roll(roll: u32) -> Category {
    if roll < VERB_BELOW {
        Category::Verb
    } else if roll < NOUN_BELOW {
        Category::Noun
    } else {
        Category::Blank
    }
}

pub fn generate<R: Rng + ?Sized>(
    words: &WordBank,
    layout: &LayoutSpec,
    rng: &mut R,
) -> Result<Vec<String>, ConfigError> {
    generate_bounded(words, layout, rng, DEFAULT_MAX_DRAWS)
}

/// Builds the command list in draw order, cased per the layout. Empty
/// strings mark visible blank slots.
pub fn generate_bounded<R: Rng + ?Sized>(
    words: &WordBank,
    layout: &LayoutSpec,
    rng: &mut R,
    max_draws: usize,
) -> Result<Vec<String>, ConfigError> {
    let target = layout.target_count();
    let mut commands: Vec<String> = Vec::with_capacity(layout.slot_count());
    let mut nouns: Vec<&str> = words.nouns.iter().map(String::as_str).collect();
    let mut blank_credit = 0usize;
    let mut draws = 0usize;

    while commands.len() < target.saturating_sub(blank_credit) {
        if draws >= max_draws {
            return Err(ConfigError::GenerationExhausted {
                draws,
                emitted: commands.len(),
                target: target.saturating_sub(blank_credit),
            });
        }
        draws += 1;

        let category = category_for_roll(rng.random_range(0..=ROLL_MAX));
        let raw: String = match category {
            Category::Verb => match words.verbs.choose(rng) {
                Some(verb) => verb.clone(),
                None => continue,
            },
            Category::Noun if commands.is_empty() => FIRST_NOUN_COMMAND.to_string(),
            Category::Noun => {
                if nouns.is_empty() {
                    continue;
                }
                let idx = rng.random_range(0..nouns.len());
                nouns.swap_remove(idx).to_string()
            }
            Category::Blank if layout.allows_blank_slots && !commands.is_empty() => {
                if layout.blanks_collapse_list {
                    blank_credit += 1;
                    trace!("Blank draw collapses the list (credit {blank_credit}).");
                    continue;
                }
                commands.push(String::new());
                continue;
            }
            Category::Blank => continue,
        };

        let cmd = normalize(&raw);
        let len = cmd.chars().count();
        if cmd.trim().is_empty() || len > layout.max_command_length {
            trace!("Rejected {raw:?} ({len} chars, limit {}).", layout.max_command_length);
            continue;
        }
        trace!("Draw {draws}: {category:?} -> {cmd:?}");
        commands.push(cmd);
    }

    if layout.reserved_item_slot {
        commands.push(ITEM_COMMAND.to_string());
    }
    apply_casing(&mut commands, layout.force_uppercase);

    debug!(
        "Generated {} command(s) in {draws} draw(s), {blank_credit} collapsed blank(s).",
        commands.len()
    );
    Ok(commands)
}
