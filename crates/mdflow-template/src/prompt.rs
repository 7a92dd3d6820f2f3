//! Interactive variable recovery (spec §4.8, §3 VariableHistory): when a
//! strict-mode render fails on a missing variable and stdin is a TTY, the
//! caller loops prompting for each undeclared variable in extraction
//! order, pre-filling from `VariableHistory` and writing the answer back.

use std::collections::HashMap;
use std::path::Path;

use dialoguer::Input;
use mdflow_config::VariableHistory;
use mdflow_core::MdflowError;

use crate::extract::extract_variables;

/// Prompts for every variable `extract_variables(body)` names that is
/// absent from `variables`, defaulting each prompt to the agent's
/// remembered value if one exists, and records the answers back into
/// `history` for `agent_path`.
pub fn recover_missing_variables(
    body: &str,
    agent_path: &Path,
    variables: &mut HashMap<String, String>,
    history: &mut VariableHistory,
) -> Result<(), MdflowError> {
    let remembered = history.for_agent(agent_path);
    let mut answers = HashMap::new();

    for name in extract_variables(body) {
        if variables.contains_key(&name) {
            continue;
        }
        let mut input = Input::<String>::new().with_prompt(&name);
        if let Some(default) = remembered.get(&name) {
            input = input.default(default.clone());
        }
        let answer = input.interact_text().map_err(|_| MdflowError::UserCancelled)?;
        answers.insert(name.clone(), answer.clone());
        variables.insert(name, answer);
    }

    if !answers.is_empty() {
        history
            .record(agent_path, &answers)
            .map_err(|e| MdflowError::TemplateRenderError(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_variables_already_provided() {
        let tmp = tempfile::tempdir().unwrap();
        let agent_path = tmp.path().join("agent.md");
        let mut history = VariableHistory::load_from(tmp.path().join("history.json")).unwrap();
        let mut vars = HashMap::new();
        vars.insert("_name".to_string(), "given".to_string());
        recover_missing_variables("{{ _name }}", &agent_path, &mut vars, &mut history).unwrap();
        assert_eq!(vars.get("_name"), Some(&"given".to_string()));
    }
}
