use crate::cli::TileArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use oligoforge::engine::library::Library;
use tracing::info;

pub fn run(args: TileArgs) -> Result<()> {
    let config = PartialRunConfig::from_file(&args.config)?.merge_with_cli(&args.overrides)?;
    let library = Library::new(config.protein, config.library)?;
    info!("Tiling plan computed for {} positions.", library.positions());
    print!("{}", render_plan(&library));
    Ok(())
}

fn render_plan(library: &Library) -> String {
    let tiling = library.config().tiling;
    let mut out = format!(
        "{} positions (oligo {} codons, overlap {} codons, stride {})\n",
        library.positions(),
        tiling.oligo_length,
        tiling.overlap_length,
        tiling.stride()
    );
    let mut total = 0;
    for plan in library.plan() {
        let groups: Vec<String> = plan
            .groups
            .iter()
            .filter_map(|&index| library.groups().get(index))
            .map(|g| format!("{} {} x{}", g.codon(), g.region(), g.level_count()))
            .collect();
        out.push_str(&format!(
            "  position {:>3}: codons {:>4}..{:<4} variants {:>4}  {}\n",
            plan.position,
            plan.span.start,
            plan.span.end,
            plan.variants,
            if groups.is_empty() {
                "-".to_string()
            } else {
                groups.join(", ")
            }
        ));
        total += plan.variants;
    }
    out.push_str(&format!("{total} oligos in total\n"));
    out
}
