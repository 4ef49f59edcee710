//! Help sections shown by the `help` command and `cherry --help`.

#[derive(Clone, Debug)]
pub struct HelpItem {
    pub keys: &'static str,
    pub desc: &'static str,
    pub example: &'static str,
}

#[derive(Clone, Debug)]
pub struct HelpSection {
    pub title: &'static str,
    pub items: Vec<HelpItem>,
}

/// Command reference, grouped the way the help screen shows it.
pub fn get_command_help() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Adding tasks",
            items: vec![
                HelpItem {
                    keys: "todo DESCRIPTION",
                    desc: "Add a plain task",
                    example: "todo buy coffee beans",
                },
                HelpItem {
                    keys: "deadline DESCRIPTION /by DATE",
                    desc: "Add a task due on a date (yyyy-MM-dd)",
                    example: "deadline submit report /by 2025-12-31",
                },
                HelpItem {
                    keys: "event DESCRIPTION /from START /to END",
                    desc: "Add an event with start and end labels",
                    example: "event team meeting /from 2pm /to 4pm",
                },
            ],
        },
        HelpSection {
            title: "Managing tasks",
            items: vec![
                HelpItem {
                    keys: "list",
                    desc: "Show every task",
                    example: "",
                },
                HelpItem {
                    keys: "find KEYWORD",
                    desc: "Show tasks whose description contains KEYWORD",
                    example: "find book",
                },
                HelpItem {
                    keys: "mark INDEX",
                    desc: "Mark a task as done",
                    example: "mark 2",
                },
                HelpItem {
                    keys: "unmark INDEX",
                    desc: "Mark a task as not done",
                    example: "unmark 2",
                },
                HelpItem {
                    keys: "update INDEX [/desc D] [/by DATE] [/from S] [/to E]",
                    desc: "Change some fields of a task",
                    example: "update 1 /desc new name",
                },
                HelpItem {
                    keys: "duplicate INDEX",
                    desc: "Append a copy of a task",
                    example: "duplicate 3",
                },
                HelpItem {
                    keys: "delete INDEX",
                    desc: "Remove a task",
                    example: "delete 1",
                },
            ],
        },
        HelpSection {
            title: "Other",
            items: vec![
                HelpItem {
                    keys: "help",
                    desc: "Show this menu",
                    example: "",
                },
                HelpItem {
                    keys: "bye",
                    desc: "Save and quit",
                    example: "",
                },
            ],
        },
    ]
}

pub fn render_help(sections: &[HelpSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(section.title);
        out.push_str(":\n");
        for item in section.items.iter() {
            out.push_str(&format!("  {}\n      {}\n", item.keys, item.desc));
            if !item.example.is_empty() {
                out.push_str(&format!("      e.g. {}\n", item.example));
            }
        }
        out.push('\n');
    }
    out.push_str("Commands are case-insensitive and task numbers start from 1.\n");
    out.push_str("The list holds up to 100 tasks by default (max_task_index in config.toml).");
    out
}
