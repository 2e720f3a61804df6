use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use zonetune_core::{ProcessOutcome, ResetOutcome};
use zonetune_model::ZoneRegistry;

pub fn print_sync_summary(zone: &str, outcome: &ProcessOutcome) {
    let media = step_label(outcome.media_skipped);
    let beatmap = step_label(outcome.beatmap_skipped);
    println!("Zone: {zone}");
    println!("Audio: {} ({media})", outcome.media_path.display());
    println!("Beatmap: {} ({beatmap})", outcome.beatmap_path.display());
    if let Some(backup) = &outcome.backup_path {
        println!("Backup: {}", backup.display());
    }
    if outcome.save_written {
        println!("Save: {} (written)", outcome.save_path.display());
    } else {
        println!("Save: {} (already up to date)", outcome.save_path.display());
    }
}

pub fn print_reset_summary(outcome: &ResetOutcome) {
    println!(
        "Reset {} zone(s) in {}",
        outcome.zones_reset,
        outcome.save_path.display()
    );
}

pub fn print_zones(registry: &ZoneRegistry) {
    let mut table = Table::new();
    table.set_header(vec!["Zone", "Aliases", "Slot"]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for zone in registry.all() {
        table.add_row(vec![
            Cell::new(&zone.id),
            Cell::new(zone.aliases.join(", ")),
            Cell::new(zone.slot_index),
        ]);
    }
    println!("{table}");
}

fn step_label(skipped: bool) -> &'static str {
    if skipped { "reused" } else { "created" }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
