use chrono::{Local, NaiveDate};
use resource_plan::{
    Hierarchy, NodeKind, Period, PlanWorkspace, PlannerConfig, ReferenceMonth,
    export_report_csv, load_plans_from_csv, load_snapshot_from_json, render_cell,
    render_text_table, report_dataframe, save_snapshot_to_json, telemetry,
};
use std::io::{self, Write};

struct Session {
    workspace: PlanWorkspace,
    reference: ReferenceMonth,
    start: ReferenceMonth,
    projects: Hierarchy,
    org: Hierarchy,
}

impl Session {
    fn new(workspace: PlanWorkspace) -> Self {
        let reference = ReferenceMonth::from_date(Local::now().date_naive());
        let start = ReferenceMonth::new(reference.year, 1);
        let projects = workspace.project_tree();
        let org = workspace.org_tree();
        Self {
            workspace,
            reference,
            start,
            projects,
            org,
        }
    }

    fn rebuild_trees(&mut self) {
        self.projects = self.workspace.project_tree();
        self.org = self.workspace.org_tree();
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load json <path>                   Load a snapshot from JSON\n  load csv <path>                    Replace resource plans from CSV\n  save json <path>                   Write the current snapshot to JSON\n  reference <YYYY-MM>                Set the month treated as current\n  start <YYYY-MM>                    Set the first month of the reporting window\n  holiday <YYYY-MM-DD>               Mark a non-working day for FTE conversion\n  summary                            Show the plan-vs-actual table\n  totals                             Show monthly totals per business unit\n  conflicts                          List role name conflicts\n  cell <plan> <actual> <period>      Render one cell (period: past|current|future)\n  tree <projects|org> [term]         Show a tree, optionally filtered\n  expand <line|team> <id>            Expand a product line or sub team\n  collapse <line|team> <id>          Collapse a product line or sub team\n  export csv <path>                  Export the summary table to CSV\n  quit|exit                          Exit"
    );
}

fn print_summary(session: &Session) {
    let months = session.workspace.window(session.start);
    let report = session.workspace.report(&months, session.reference);
    if report.is_empty() {
        println!("No resource plan data.");
        return;
    }
    match report_dataframe(&report) {
        Ok(df) => println!(
            "Plan vs actual (reference {}):\n{}",
            session.reference,
            render_text_table(&df)
        ),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_totals(session: &Session) {
    let months = session.workspace.window(session.start);
    let report = session.workspace.report(&months, session.reference);
    if report.is_empty() {
        println!("No resource plan data.");
        return;
    }
    for unit in &report.units {
        println!("{} (TBD planned {:.1})", unit.name, unit.tbd_planned);
        for total in &unit.totals {
            println!(
                "  {:<10} plan {:>6.1}  actual {:>6.1}",
                total.label, total.plan, total.actual
            );
        }
    }
    println!("All units");
    for total in &report.grand_totals {
        println!(
            "  {:<10} plan {:>6.1}  actual {:>6.1}",
            total.label, total.plan, total.actual
        );
    }
}

fn print_tree(tree: &Hierarchy, term: &str) {
    let rows = tree.visible_rows(term);
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    for row in rows {
        println!("{}", row.display_line());
    }
}

fn parse_node(kind: &str) -> Option<(&'static str, NodeKind)> {
    match kind {
        "line" => Some(("projects", NodeKind::ProductLine)),
        "team" => Some(("org", NodeKind::SubTeam)),
        _ => None,
    }
}

fn main() {
    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            PlannerConfig::default()
        }
    };
    telemetry::init_tracing(&config.log_level);
    let workspace = PlanWorkspace::from_config(&config).unwrap_or_default();
    let mut session = Session::new(workspace);

    println!("Resource Plan (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_snapshot_from_json(path) {
                    Ok(snapshot) => match session.workspace.set_snapshot(snapshot) {
                        Ok(()) => {
                            session.rebuild_trees();
                            println!("Snapshot loaded from {}.", path);
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("Error loading snapshot: {}", e),
                },
                (Some("csv"), Some(path)) => match load_plans_from_csv(path) {
                    Ok(records) => {
                        let count = records.len();
                        let mut snapshot = session.workspace.snapshot().clone();
                        snapshot.resource_plans = records;
                        match session.workspace.set_snapshot(snapshot) {
                            Ok(()) => println!("Loaded {} resource plans from {}.", count, path),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    Err(e) => println!("Error loading plans: {}", e),
                },
                _ => println!("Usage: load <json|csv> <path>"),
            },
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => {
                    match save_snapshot_to_json(session.workspace.snapshot(), path) {
                        Ok(()) => println!("Snapshot saved to {}.", path),
                        Err(e) => println!("Error saving snapshot: {}", e),
                    }
                }
                _ => println!("Usage: save json <path>"),
            },
            "reference" | "start" => match parts.next().map(str::parse::<ReferenceMonth>) {
                Some(Ok(month)) => {
                    if cmd == "reference" {
                        session.reference = month;
                    } else {
                        session.start = month;
                    }
                    println!("{} set to {}.", cmd, month);
                }
                Some(Err(e)) => println!("Invalid month: {}", e),
                None => println!("Usage: {} <YYYY-MM>", cmd),
            },
            "holiday" => match parts.next().map(|s| s.parse::<NaiveDate>()) {
                Some(Ok(date)) => {
                    session.workspace.add_holiday(date);
                    println!("Holiday added: {}.", date);
                }
                Some(Err(e)) => println!("Invalid date: {}", e),
                None => println!("Usage: holiday <YYYY-MM-DD>"),
            },
            "summary" => print_summary(&session),
            "totals" => print_totals(&session),
            "conflicts" => {
                let months = session.workspace.window(session.start);
                let groups = session.workspace.groups(&months);
                if groups.name_conflicts().is_empty() {
                    println!("No name conflicts.");
                }
                for conflict in groups.name_conflicts() {
                    let other = if conflict.kept == conflict.existing {
                        &conflict.incoming
                    } else {
                        &conflict.existing
                    };
                    println!(
                        "{} / role {}: kept '{}' (saw '{}' on plan {})",
                        conflict.business_unit,
                        conflict.role_id,
                        conflict.kept,
                        other,
                        conflict.record_id
                    );
                }
            }
            "cell" => {
                let plan = parts
                    .next()
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|v| v.is_finite());
                let actual = parts
                    .next()
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|v| v.is_finite());
                let period = parts.next().and_then(|s| s.parse::<Period>().ok());
                match (plan, actual, period) {
                    (Some(plan), Some(actual), Some(period)) => {
                        let cell = render_cell(plan, actual, period);
                        println!("{} [{}]", cell.text, cell.variance.as_str());
                    }
                    _ => println!("Usage: cell <plan> <actual> <past|current|future>"),
                }
            }
            "tree" => {
                let which = parts.next().unwrap_or("");
                let term = parts.collect::<Vec<_>>().join(" ");
                match which {
                    "projects" => print_tree(&session.projects, &term),
                    "org" => print_tree(&session.org, &term),
                    _ => println!("Usage: tree <projects|org> [term]"),
                }
            }
            "expand" | "collapse" => {
                let node = parts.next().and_then(parse_node);
                let id = parts.next().and_then(|s| s.parse::<i64>().ok());
                match (node, id) {
                    (Some((which, kind)), Some(id)) => {
                        let tree = if which == "projects" {
                            &mut session.projects
                        } else {
                            &mut session.org
                        };
                        if cmd == "collapse" {
                            tree.collapse(kind, id);
                            println!("Collapsed {} {}.", kind.as_str(), id);
                            continue;
                        }
                        match tree.expand(kind, id, &session.workspace.loader()) {
                            Ok(()) => {
                                println!("Expanded {} {}.", kind.as_str(), id);
                                print_tree(tree, "");
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: {} <line|team> <id>", cmd),
                }
            }
            "export" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => {
                    let months = session.workspace.window(session.start);
                    let report = session.workspace.report(&months, session.reference);
                    match export_report_csv(&report, path) {
                        Ok(()) => println!("Summary exported to {}.", path),
                        Err(e) => println!("Error exporting summary: {}", e),
                    }
                }
                _ => println!("Usage: export csv <path>"),
            },
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}
