//! Plan rendering for task trees
//!
//! The output is stable: children are always listed in append order, no
//! matter in which order they finish at runtime.

use crate::tree::TaskTree;

const INDENT: &str = "    ";

pub(crate) fn describe_tree(tree: &TaskTree) -> String {
    if tree.is_empty() {
        return "no tasks".to_string();
    }

    let descriptions: Vec<String> = tree
        .tasks()
        .iter()
        .map(|task| {
            let description = task.describe();
            match description.strip_suffix('\n') {
                Some(trimmed) => trimmed.to_string(),
                None => description,
            }
        })
        .collect();

    let noun = if tree.is_sub_task { "sub-task" } else { "task" };

    if let [only] = descriptions.as_slice() {
        if tree.is_sub_task {
            return only.clone();
        }
        return format!("1 {noun}: {{ {only} }}");
    }

    let count = descriptions.len();
    let mode = if tree.parallel { "parallel" } else { "sequential" };

    let mut msg = if tree.is_sub_task {
        let mut msg = format!("\n{INDENT}{count} {mode} {noun}s: {{ \n");
        for description in &descriptions {
            msg.push_str(&indent_child(description));
            msg.push_str(",\n");
        }
        msg.push_str(INDENT);
        msg.push('}');
        msg
    } else {
        format!(
            "\n{count} {mode} {noun}s: {{ {} \n}}",
            descriptions.join(", ")
        )
    };

    if tree.plan_mode {
        msg.insert_str(0, "(plan) ");
    }
    msg.push('\n');
    msg
}

// Nested multi-child trees move one level deeper; plain tasks sit two levels in.
fn indent_child(description: &str) -> String {
    if description.contains("sub-task") {
        let description = description.strip_prefix('\n').unwrap_or(description);
        description
            .split('\n')
            .map(|line| format!("{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{INDENT}{INDENT}{description}")
    }
}
