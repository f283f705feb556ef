use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use strum_macros::{Display, EnumString};
use teamforge::optimizer::SolveSummary;
use teamforge::partition::PartitionState;
use teamforge::scorer::stats::StatsTable;
use teamforge::scorer::CostBreakdown;
use teamforge::TfResult;

#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group: usize,
    pub cost: f64,
    pub members: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SolutionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SolveSummary>,
    pub cost: CostBreakdown,
    pub groups: Vec<GroupReport>,
    pub stats: StatsTable,
}

impl SolutionReport {
    pub fn build(state: &PartitionState, summary: Option<&SolveSummary>) -> TfResult<Self> {
        let groups = (0..state.group_count())
            .map(|g| {
                Ok(GroupReport {
                    group: g,
                    cost: state.group_cost(g)?,
                    members: state.members(g)?.into_iter().collect(),
                })
            })
            .collect::<TfResult<Vec<_>>>()?;

        Ok(Self {
            summary: summary.copied(),
            cost: state.cost_breakdown()?,
            groups,
            stats: state.stats()?,
        })
    }
}

pub fn render_solution(
    state: &PartitionState,
    summary: Option<&SolveSummary>,
    format: OutputFormat,
) -> TfResult<()> {
    let report = SolutionReport::build(state, summary)?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_stats_table(&report.stats);
            print_groups(&report.groups);
            print_cost_breakdown(&report.cost);
            if let Some(s) = &report.summary {
                println!(
                    "Steps: {} ({} accepted), initial cost: {:.6}",
                    s.steps, s.accepted, s.initial_cost
                );
            }
            println!("Final cost: {:.6}", report.cost.total);
        }
    }
    Ok(())
}

pub fn print_stats_table(stats: &StatsTable) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("N"),
    ];
    header.extend(stats.categorical.iter().map(|c| Cell::new(c).fg(Color::Cyan)));
    header.extend(stats.continuous.iter().map(|c| Cell::new(c).fg(Color::Green)));
    header.push(Cell::new("Sep").fg(Color::Red));
    header.push(Cell::new("Tog").fg(Color::Yellow));
    let width = header.len();
    table.set_header(header);

    for i in 1..width {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let overlap = |o: Option<usize>| o.map_or_else(|| "-".to_string(), |v| v.to_string());

    for row in &stats.rows {
        let mut cells = vec![Cell::new(row.label()), Cell::new(row.n)];
        cells.extend(row.categorical_counts.iter().map(Cell::new));
        cells.extend(row.continuous_means.iter().map(|m| Cell::new(format!("{:.2}", m))));
        cells.push(Cell::new(overlap(row.max_separate_overlap)));
        cells.push(Cell::new(overlap(row.max_together_overlap)));

        if row.group.is_none() {
            cells = cells
                .into_iter()
                .map(|c| c.add_attribute(Attribute::Bold))
                .collect();
        }
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_groups(groups: &[GroupReport]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("Cost").fg(Color::Cyan),
        Cell::new("Members"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for g in groups {
        table.add_row(vec![
            Cell::new(g.group),
            Cell::new(format!("{:.4}", g.cost)),
            Cell::new(g.members.join(", ")),
        ]);
    }
    println!("{}", table);
}

pub fn print_cost_breakdown(cost: &CostBreakdown) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Categorical"),
        Cell::new("Continuous"),
        Cell::new("Separate").fg(Color::Red),
        Cell::new("Together").fg(Color::Green),
        Cell::new("Total").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.4}", cost.categorical)),
        Cell::new(format!("{:.4}", cost.continuous)),
        Cell::new(format!("{:.1}", cost.separate)),
        Cell::new(format!("{:.1}", cost.together)),
        Cell::new(format!("{:.4}", cost.total)).add_attribute(Attribute::Bold),
    ]);
    println!("{}", table);
}
