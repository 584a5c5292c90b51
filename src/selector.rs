//! Action selection.

use crate::action::CombatAction;
use crate::character_id::CharacterId;
use crate::combat::Combat;
use std::sync::Arc;

/// Picks the action a character takes on its turn.
pub trait CombatActionSelector: Send + Sync {
    /// `None` means the character does nothing this turn.
    fn choose_action(&self, combat: &Combat, character: &CharacterId) -> Option<Arc<dyn CombatAction>>;
}

/// Takes the first applicable action by ascending priority.
///
/// Actions sharing a priority keep their registration order. Characters
/// that cannot act get no action.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCombatActionSelector;

impl CombatActionSelector for DefaultCombatActionSelector {
    fn choose_action(&self, combat: &Combat, character: &CharacterId) -> Option<Arc<dyn CombatAction>> {
        if !combat.character(character).is_some_and(|c| c.can_act()) {
            return None;
        }
        let mut actions = combat.actions().to_vec();
        actions.sort_by_key(|action| action.priority());
        actions
            .into_iter()
            .find(|action| action.should_use(combat, character))
    }
}

/// Never picks an action.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleActionSelector;

impl CombatActionSelector for IdleActionSelector {
    fn choose_action(&self, _: &Combat, _: &CharacterId) -> Option<Arc<dyn CombatAction>> {
        None
    }
}
