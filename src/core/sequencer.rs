use crate::domain::steps::{FieldPresence, Route, StepDefinition};
use std::collections::HashSet;
use std::hash::Hash;

/// 回傳目標步驟之前第一個未完成步驟的路由；全部完成則為 None。
///
/// Only steps with an index strictly below `target_index` are inspected, so the
/// target step itself and anything after it never cause a redirect.
pub fn compute_redirect<F, D>(
    steps: &[StepDefinition<F>],
    target_index: usize,
    draft: &D,
) -> Option<Route>
where
    F: Copy,
    D: FieldPresence<F>,
{
    let mut ordered: Vec<&StepDefinition<F>> = steps.iter().collect();
    ordered.sort_by_key(|def| def.index);

    ordered
        .into_iter()
        .take_while(|def| def.index < target_index)
        .find(|def| !def.fields.iter().all(|field| draft.is_present(*field)))
        .map(|def| def.route)
}

/// Checks a step table: indices contiguous from 1, every field set non-empty,
/// and no field claimed by more than one step.
pub fn validate_step_definitions<F>(steps: &[StepDefinition<F>]) -> Result<(), String>
where
    F: Copy + Eq + Hash + std::fmt::Debug,
{
    let mut claimed: HashSet<F> = HashSet::new();

    for (position, def) in steps.iter().enumerate() {
        if def.index != position + 1 {
            return Err(format!(
                "step at position {} has index {}, expected {}",
                position,
                def.index,
                position + 1
            ));
        }
        if def.fields.is_empty() {
            return Err(format!("step {} claims no fields", def.index));
        }
        for field in def.fields {
            if !claimed.insert(*field) {
                return Err(format!(
                    "field {:?} of step {} is already claimed by an earlier step",
                    field, def.index
                ));
            }
        }
    }

    Ok(())
}
