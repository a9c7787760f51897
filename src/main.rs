use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use fabmenu::config::{self, Config, ExpansionDirection, HorizontalAlignment, VerticalAlignment};
use fabmenu::gui::menu::geometry;
use fabmenu::gui::menu::{
    ButtonId, ButtonSize, FloatingActionButton, LayoutGeometry, LayoutPass, MenuContext, Submenu,
};
use fabmenu::gui::units::{Point, Rect, Size};
use std::path::PathBuf;

// Used when neither the config nor the command line names any buttons.
const FALLBACK_BUTTON_COUNT: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "fabmenu", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Lay out an expanded submenu and print the result.
    Layout(LayoutArgs),
    /// Write the default configuration file if none exists.
    InitConfig,
}

#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// Expansion direction (up, down, left, right, round, fan or 0-5)
    #[arg(short, long)]
    direction: Option<ExpansionDirection>,

    /// Use N mini buttons instead of the configured ones
    #[arg(short, long)]
    buttons: Option<usize>,

    #[arg(long)]
    h_align: Option<HorizontalAlignment>,

    #[arg(long)]
    v_align: Option<VerticalAlignment>,

    #[arg(long)]
    spacing: Option<i32>,

    #[arg(long)]
    radius: Option<i32>,

    /// Angle overflow in degrees
    #[arg(long)]
    overflow: Option<f64>,

    /// Trigger centre, defaults to just outside the submenu on its opening side
    #[arg(long, requires = "pivot_y")]
    pivot_x: Option<f64>,

    #[arg(long, requires = "pivot_x")]
    pivot_y: Option<f64>,

    /// Print the layout pass as JSON
    #[arg(long)]
    json: bool,

    /// Render the expanded submenu to a PNG file (needs the `preview` feature)
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout(args) => run_layout(args),
        Commands::InitConfig => {
            let path = config::write_default_config().context("Failed to write config")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut Config, args: &LayoutArgs) {
    let submenu = &mut config.submenu;
    if let Some(direction) = args.direction {
        submenu.expand_direction = direction;
    }
    if let Some(spacing) = args.spacing {
        submenu.button_spacing = spacing;
    }
    if let Some(radius) = args.radius {
        submenu.radius = radius;
    }
    if let Some(overflow) = args.overflow {
        submenu.angle_overflow = overflow;
    }
    if let Some(h) = args.h_align {
        config.menu.horizontal_alignment = h;
    }
    if let Some(v) = args.v_align {
        config.menu.vertical_alignment = v;
    }
}

fn build_buttons(config: &Config, count: Option<usize>) -> Vec<FloatingActionButton> {
    let count = count.or_else(|| config.buttons.is_empty().then_some(FALLBACK_BUTTON_COUNT));
    match count {
        Some(n) => (0..n)
            .map(|i| {
                FloatingActionButton::new(ButtonId::new(format!("button-{i}")))
                    .with_size(ButtonSize::Mini)
            })
            .collect(),
        None => config
            .buttons
            .iter()
            .map(FloatingActionButton::from_style)
            .collect(),
    }
}

/// Trigger centre sitting against the side the submenu opens from.
fn default_pivot(
    context: &MenuContext,
    direction: ExpansionDirection,
    area: Rect,
    largest_child: Size,
) -> Point {
    let center = area.center();
    let half_w = context.trigger_size.width as f64 / 2.0;
    let half_h = context.trigger_size.height as f64 / 2.0;
    match direction {
        ExpansionDirection::Up => Point::new(center.x, area.bottom() as f64 + half_h),
        ExpansionDirection::Down => Point::new(center.x, area.top as f64 - half_h),
        ExpansionDirection::Left => Point::new(area.right() as f64 + half_w, center.y),
        ExpansionDirection::Right => Point::new(area.left as f64 - half_w, center.y),
        ExpansionDirection::Round => center,
        ExpansionDirection::Fan => geometry::fan_pivot(context, area, largest_child),
    }
}

fn run_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let mut config = config::load_or_default();
    apply_overrides(&mut config, &args);

    let trigger = FloatingActionButton::new(ButtonId::new("trigger"))
        .with_size(config.menu.trigger_size);
    let context = MenuContext::for_trigger(
        config.menu.horizontal_alignment,
        config.menu.vertical_alignment,
        &trigger,
    );

    let mut submenu = Submenu::new(config.submenu.clone());
    submenu.add_buttons(build_buttons(&config, args.buttons));
    submenu.attach(context)?;

    // A collapsed pass only measures, which is enough to place the default pivot.
    let measured = submenu.layout()?;
    let pivot = match (args.pivot_x, args.pivot_y) {
        (Some(x), Some(y)) => Point::new(x, y),
        _ => {
            let sizes: Vec<Size> = measured.geometry.visible().map(|(_, r)| r.size()).collect();
            default_pivot(
                &context,
                submenu.expand_direction(),
                Rect::from_size(measured.geometry.size),
                geometry::largest(&sizes),
            )
        }
    };
    submenu.attach(context.with_pivot(pivot))?;

    submenu.show();
    let pass = submenu.layout()?;
    for animation in &pass.animations {
        submenu.complete_entrance(animation);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pass)?);
    } else {
        print_pass(&submenu, &pass);
    }

    if let Some(path) = &args.preview {
        render_preview(path, &submenu, &pass.geometry)?;
    }
    Ok(())
}

fn print_pass(submenu: &Submenu, pass: &LayoutPass) {
    let size = pass.geometry.size;
    println!(
        "{} submenu, {}x{}, pivot ({:.1}, {:.1})",
        submenu.expand_direction(),
        size.width,
        size.height,
        submenu.parent().map_or(0.0, |p| p.pivot.x),
        submenu.parent().map_or(0.0, |p| p.pivot.y),
    );
    for (i, button) in submenu.buttons().iter().enumerate() {
        match submenu.placement(i) {
            Some(r) => println!(
                "  {:<12} {:>5} {:>5} {:>4}x{:<4}",
                button.id(),
                r.left,
                r.top,
                r.width,
                r.height
            ),
            None => println!("  {:<12} gone", button.id()),
        }
    }
    for a in &pass.animations {
        println!(
            "  animate {} #{} ({:.1}, {:.1}) -> ({:.1}, {:.1}) over {} ms, {:?}",
            a.button,
            a.index,
            a.from.x,
            a.from.y,
            a.to.x,
            a.to.y,
            a.duration.as_millis(),
            a.easing
        );
    }
}

#[cfg(feature = "preview")]
fn render_preview(
    path: &std::path::Path,
    submenu: &Submenu,
    geometry: &LayoutGeometry,
) -> anyhow::Result<()> {
    fabmenu::gui::menu::render_png(path, submenu, geometry)
        .with_context(|| format!("Failed to render preview to {}", path.display()))
}

#[cfg(not(feature = "preview"))]
fn render_preview(
    _path: &std::path::Path,
    _submenu: &Submenu,
    _geometry: &LayoutGeometry,
) -> anyhow::Result<()> {
    anyhow::bail!("fabmenu was built without the `preview` feature")
}
