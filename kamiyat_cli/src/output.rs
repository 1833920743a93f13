//! Human-readable rendering for the terminal. `--format json` bypasses this
//! module and prints the serde form.

use kamiyat_core::calculations::aggregate::{bags_approx, trucks_needed, AggregateResult};
use kamiyat_core::calculations::roof_slab::FloorModeKind;
use kamiyat_core::calculations::roof_slab_steel::SlabBars;
use kamiyat_core::calculations::CalculationResult;
use kamiyat_core::reference::ReferenceTables;
use kamiyat_core::report::QuantityReport;
use kamiyat_core::validation::ValidationResult;

const RULE: &str = "═══════════════════════════════════════";

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title.to_uppercase());
    println!("{}", RULE);
    println!();
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

pub fn print_validation(result: &ValidationResult) {
    println!("{} validation", status_icon(result.is_ok()));
    for error in result.errors() {
        println!("  - {}", error);
    }
}

pub fn print_result(result: &CalculationResult) {
    let calculation_type = result.calculation_type();
    banner(&format!(
        "{} ({})",
        calculation_type.display_name(),
        calculation_type.arabic_name()
    ));

    match result {
        CalculationResult::FoundationBase(r) => {
            println!("Soil:      {}", r.soil_type);
            println!("Building:  {}", r.building_type);
            println!("Bases:     {}", r.number_of_bases);
            println!("Footprint: {:.2} m²", r.total_footprint_m2);
            println!("Reinforced concrete: {:.2} m³", r.reinforced_concrete_m3);
            println!("Plain concrete:      {:.2} m³", r.plain_concrete_m3);
            println!("Floor area:          {:.2} m²", r.total_floor_area_m2);
        }
        CalculationResult::Columns(r) => {
            for (i, column) in r.columns.iter().enumerate() {
                println!("  Column {}: {:.3} m³", i + 1, column.volume_m3);
            }
        }
        CalculationResult::GroundBridges(r) => {
            for (i, bridge) in r.bridges.iter().enumerate() {
                println!("  Bridge {}: {:.3} m³", i + 1, bridge.volume_m3);
            }
        }
        CalculationResult::RoofSlab(r) => {
            if let (Some(count), Some(volume)) = (r.ribs_count, r.ribs_volume_m3) {
                println!("Ribs:        {} ({:.3} m³)", count, volume);
                println!("Base slab:   {:.3} m³", r.base_slab_volume_m3);
            }
            if let Some(multi) = &r.multi_floor {
                println!("Floors:      {}", multi.floors_count);
                println!("Dead load:   {:.1} kN", multi.dead_load_kn);
                println!("Live load:   {:.1} kN", multi.live_load_kn);
                println!("Total load:  {:.1} kN", multi.total_load_kn);
            } else if r.floor_mode == FloorModeKind::Single {
                println!("Mode:        single floor");
            }
        }
        CalculationResult::RoofBeamsSteel(r) => {
            println!("Beams:       {}", r.beam_count);
            println!("Bar:         Ø{} mm ({:.1} mm²)", r.rod_diameter_mm, r.cross_section_area_mm2);
            println!("Depth d:     {:.0} mm", r.effective_depth_mm);
            if let Some(sum) = r.sum_wl2 {
                println!("Σ wL²:       {:.2}", sum);
            }
            println!("M upper:     {:.2} kN·m", r.moment_upper_knm);
            println!("M lower:     {:.2} kN·m", r.moment_lower_knm);
            println!("As upper:    {:.1} mm²", r.as_upper_mm2);
            println!("As lower:    {:.1} mm²", r.as_lower_mm2);
        }
        CalculationResult::RoofSlabSteel(r) => match &r.bars {
            SlabBars::Mesh {
                adjusted_length_m,
                adjusted_width_m,
                mesh_area_m2,
                ..
            } => {
                println!(
                    "Mesh:        {:.2} × {:.2} m after lap ({:.2} m²)",
                    adjusted_length_m, adjusted_width_m, mesh_area_m2
                );
            }
            SlabBars::Separate { spacing_m, k, .. } => {
                println!("Spacing:     {:.2} m (k = {:.2})", spacing_m, k);
            }
        },
        CalculationResult::ElementVolume(r) => {
            println!("Tab:         {} ({})", r.tab.as_str(), r.tab.arabic_name());
        }
    }

    if let Some(volume) = result.concrete_volume_m3() {
        println!();
        println!("Concrete:  {:.2} m³", volume);
        println!("Trucks:    {}", trucks_needed(volume));
        println!("Bags:      ~{}", bags_approx(volume));
    }
    let bars = result.steel_bars();
    if !bars.is_empty() {
        println!();
        println!("Steel:");
        for bar in bars {
            match bar.diameter_mm {
                Some(d) => println!("  {:<14} {} × Ø{} mm", bar.label, bar.count, d),
                None => println!("  {:<14} {}", bar.label, bar.count),
            }
        }
    }
}

pub fn print_aggregate(result: &AggregateResult) {
    banner("Concrete totals");
    for tab in &result.tabs {
        println!("  {:<24} {:.2} m³", tab.label, tab.volume_m3);
    }
    println!();
    println!("Total:   {:.2} m³", result.total_volume_m3);
    println!("Trucks:  {}", result.trucks_needed);
    println!("Bags:    ~{}", result.bags_approx);
}

pub fn print_reports(project_id: &str, reports: &[QuantityReport]) {
    banner(&format!("Reports for {}", project_id));
    if reports.is_empty() {
        println!("No reports saved.");
        return;
    }
    for report in reports {
        let sent = if report.sent_to_owner { "sent" } else { "saved" };
        println!(
            "{}  {:<18} {:<6} {}",
            report.id,
            report.calculation_type.as_str(),
            sent,
            report.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

pub fn print_reference(tables: &ReferenceTables) {
    banner("Reference tables");
    println!("Soil types:");
    for soil in &tables.soil_types {
        println!("  {:>3}  {}", soil.id, soil.name);
    }
    println!();
    println!("Building types:");
    for building in &tables.building_types {
        match building.live_load_kn_m2 {
            Some(load) => println!("  {:>3}  {} ({} kN/m²)", building.id, building.building_type, load),
            None => println!("  {:>3}  {}", building.id, building.building_type),
        }
    }
    println!();
    println!("Iron bars:");
    for bar in &tables.iron_bars {
        println!("  Ø{:<4} {:.1} mm²", bar.diameter_mm, bar.cross_sectional_area_mm2);
    }
}
