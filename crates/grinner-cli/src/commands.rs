use std::path::{Path, PathBuf};

use grinner_core::{ConfigError, CurveParams, KeySpec};
use grinner_layout::{apply, layout_keys, layout_tokens, save_row, Origin, Placement};
use grinner_parser::{decode_field, FIELD_NAME, SavedRow};
use serde_json::json;

use crate::ParamArgs;
use crate::board::Board;
use crate::error::CliError;
use crate::settings::resolve_params;

/// Fewest switches that make a row.
const MIN_ROW_KEYS: usize = 2;

pub struct PlaceArgs {
    pub board: PathBuf,
    pub params: ParamArgs,
    pub reopen: Option<String>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn preview(sizes: &[String], args: &ParamArgs, json: bool) -> Result<(), CliError> {
    let params = resolve_params(args.config.as_deref(), None, &args.overrides())?;
    let placements = layout_tokens(sizes, &params)?;
    if json {
        let text = serde_json::to_string_pretty(&json!({
            "params": params,
            "placements": placements,
        }))
        .map_err(|e| CliError::processing(e.to_string()))?;
        println!("{text}");
    } else {
        print_params(&params);
        print_placements(&placements);
    }
    Ok(())
}

pub fn place(args: &PlaceArgs) -> Result<(), CliError> {
    let mut board = Board::load(&args.board).map_err(|e| CliError::input(format!("{e:#}")))?;

    let saved = match &args.reopen {
        Some(reference) => {
            let (_, row) = board
                .find_saved_rows()
                .into_iter()
                .find(|(carrier, _)| carrier == reference)
                .ok_or_else(|| CliError::input(format!("no saved row on {reference}")))?;
            let found = board.reselect(&row);
            tracing::info!(row = %row.label(), found, "re-opened saved row");
            Some(row)
        }
        None => None,
    };
    let params = resolve_params(
        args.params.config.as_deref(),
        saved.as_ref().map(|row| row.params),
        &args.params.overrides(),
    )?;

    let saved_rows = board.find_saved_rows().len();
    let mut targets = board.gather_targets();
    if targets.len() < MIN_ROW_KEYS {
        if saved_rows > 0 && args.reopen.is_none() {
            tracing::warn!(saved_rows, "no row selected; use --reopen REF to edit a saved row");
        }
        return Err(ConfigError::RowTooShort {
            min: MIN_ROW_KEYS,
            got: targets.len(),
        }
        .into());
    }

    let keys: Vec<KeySpec> = targets.iter().map(|fp| fp.key_spec()).collect();
    let placements = layout_keys(&keys, &params)?;
    let references: Vec<String> = targets.iter().map(|fp| fp.reference.clone()).collect();

    if args.dry_run {
        print_params(&params);
        for (placement, reference) in placements.iter().zip(&references) {
            print!("{reference:<6} ");
            print_placement(placement);
        }
        return Ok(());
    }

    let report = apply(&placements, &mut targets, Origin::FirstKey)
        .map_err(|e| CliError::processing(format!("{e}; board file left unchanged")))?;

    let row = SavedRow {
        params,
        widths: keys.iter().map(|k| k.width_units).collect(),
        footprints: references,
    };
    // Only the leftmost key carries the row.
    for fp in targets.iter_mut().skip(1) {
        fp.fields.shift_remove(FIELD_NAME);
    }
    save_row(&mut *targets[0], &row)
        .map_err(|e| CliError::processing(format!("could not save row parameters: {e}")))?;

    let out = args.output.as_deref().unwrap_or(&args.board);
    board
        .save(out)
        .map_err(|e| CliError::processing(format!("{e:#}")))?;
    println!(
        "placed {} of {} keys: {} -> {}",
        report.updated,
        row.footprints.len(),
        row.label(),
        out.display()
    );
    Ok(())
}

pub fn rows(path: &Path) -> Result<(), CliError> {
    let board = Board::load(path).map_err(|e| CliError::input(format!("{e:#}")))?;
    let rows = board.find_saved_rows();
    if rows.is_empty() {
        println!("no saved rows");
    }
    for (carrier, row) in rows {
        let p = row.params;
        println!(
            "{carrier:<6} {}  sag {} mm, flat {}/{}, {}{}",
            row.label(),
            p.sag_mm,
            p.flat_left,
            p.flat_right,
            p.angle_profile,
            if p.asymmetric_correction { ", asymmetric" } else { "" }
        );
    }
    Ok(())
}

pub fn decode(text: &str) -> Result<(), CliError> {
    let row = decode_field(Some(text))?.ok_or_else(|| CliError::input("empty field"))?;
    let out = serde_json::to_string_pretty(&json!({
        "row_name": row.row_name(),
        "params": row.params,
        "widths": row.widths,
        "footprints": row.footprints,
    }))
    .map_err(|e| CliError::processing(e.to_string()))?;
    println!("{out}");
    Ok(())
}

fn print_params(p: &CurveParams) {
    println!(
        "sag {} mm, flat {}/{}, profile {}, asymmetric {}",
        p.sag_mm, p.flat_left, p.flat_right, p.angle_profile, p.asymmetric_correction
    );
}

fn print_placements(placements: &[Placement]) {
    for placement in placements {
        print!("{:<6} ", placement.index);
        print_placement(placement);
    }
}

fn print_placement(p: &Placement) {
    let role = if p.role.is_flat() { "flat" } else { "curved" };
    println!(
        "{role:<7} x {:>9.3}  y {:>8.3}  r {:>8.3}",
        p.x_mm, p.y_mm, p.rotation_deg
    );
}
