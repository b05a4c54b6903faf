use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfpaint::{
    Brush, Color, Corner, FontRegistry, FontStyle, GlyphFace, GraphicsAdapter, HtmlContainer,
    PageGeometry, Pen, PointF, RectF, RenderAdapter, RenderOptions, SizeF, TextDirection, Viewport,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rfpaint", about = "Measure text and paint sample surfaces")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the extent of TEXT, and how much of it fits MAX_WIDTH, as JSON
    Measure {
        text: String,
        /// Font size in points
        #[arg(long, default_value_t = 12.0)]
        size: f64,
        #[arg(long)]
        max_width: Option<f64>,
        /// TrueType/OpenType file to measure with instead of installed fonts
        #[arg(long)]
        font: Option<PathBuf>,
        #[arg(long, default_value = rfpaint::DEFAULT_FONT_FAMILY)]
        family: String,
    },
    /// Paint a sample card and write it as PNG
    Sample {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// JSON render options
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "The quick brown fox jumps over the lazy dog.")]
        text: String,
    },
}

#[derive(Serialize)]
struct MeasureReport {
    family: String,
    size: f64,
    width: f64,
    height: f64,
    underline_offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fit: Option<FitReport>,
}

#[derive(Serialize)]
struct FitReport {
    max_width: f64,
    char_fit: usize,
    char_fit_width: f64,
    prefix: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Cmd::Measure {
            text,
            size,
            max_width,
            font,
            family,
        } => cmd_measure(&text, size, max_width, font, family),
        Cmd::Sample {
            out,
            width,
            height,
            config,
            text,
        } => cmd_sample(out, width, height, config, text),
    }
}

fn cmd_measure(
    text: &str,
    size: f64,
    max_width: Option<f64>,
    font: Option<PathBuf>,
    family: String,
) -> Result<()> {
    let adapter = match font {
        Some(path) => {
            let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let face = GlyphFace::from_bytes(family.clone(), data, 0)?;
            let mut registry = FontRegistry::empty();
            registry.add_face(Arc::new(face), FontStyle::REGULAR);
            RenderAdapter::new(registry).with_default_family(family.clone())
        }
        None => RenderAdapter::from_options(&RenderOptions::default())?,
    };

    let font = adapter.create_font(&family, size, FontStyle::REGULAR);
    let extent = rfpaint::measure_extent(text, &font);
    let fit = max_width.map(|w| {
        let r = rfpaint::measure_fit(text, &font, w);
        FitReport {
            max_width: w,
            char_fit: r.char_fit,
            char_fit_width: r.char_fit_width,
            prefix: r.prefix(text).to_string(),
        }
    });
    let report = MeasureReport {
        family: font.family_name().to_string(),
        size,
        width: extent.width,
        height: extent.height,
        underline_offset: font.underline_offset().unwrap_or_default(),
        fit,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_sample(
    out: PathBuf,
    width: Option<u32>,
    height: Option<u32>,
    config: Option<PathBuf>,
    text: String,
) -> Result<()> {
    let mut options = match config {
        Some(path) => RenderOptions::from_json_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RenderOptions {
            viewport: Viewport { width: 480, height: 200 },
            margin: 12,
            ..Default::default()
        },
    };
    if let Some(w) = width {
        options.viewport.width = w;
    }
    if let Some(h) = height {
        options.viewport.height = h;
    }

    let adapter = RenderAdapter::from_options(&options)?;
    let mut card = SampleCard::default();
    let shot = rfpaint::render_to_png(&text, &options, &adapter, &mut card)?
        .context("nothing to render: text is blank")?;
    std::fs::write(&out, &shot.png_data).with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}x{} sample to {}", shot.width, shot.height, out.display());
    println!("{} {}", out.display(), shot.digest());
    Ok(())
}

/// Plain-text card: a rounded frame, a gradient title bar and the text
/// wrapped to the frame width, with the first line repeated right-to-left.
#[derive(Default)]
struct SampleCard {
    text: String,
    page: Option<PageGeometry>,
    lines: Vec<String>,
}

const FONT_SIZE: f64 = 12.0;
const PAD: f64 = 10.0;
const BAR: f64 = 24.0;

impl HtmlContainer for SampleCard {
    fn set_html(&mut self, html: &str, _adapter: &RenderAdapter) -> rfpaint::Result<()> {
        self.text = html.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(())
    }

    fn set_page(&mut self, page: PageGeometry) {
        self.page = Some(page);
    }

    fn perform_layout(
        &mut self,
        g: &mut GraphicsAdapter<'_>,
        adapter: &RenderAdapter,
    ) -> rfpaint::Result<()> {
        let page = self
            .page
            .ok_or_else(|| rfpaint::Error::RenderError("page geometry not set".into()))?;
        let font = adapter.create_font(adapter.default_family(), FONT_SIZE, FontStyle::REGULAR);
        let budget = page.max_size.width - PAD * 2.0;

        self.lines.clear();
        let mut rest = self.text.as_str();
        while !rest.is_empty() {
            let fit = g.measure_string_fit(rest, &font, budget);
            if fit.char_fit == 0 {
                break;
            }
            let mut line = fit.prefix(rest);
            if line.len() < rest.len() {
                if let Some(space) = line.rfind(' ') {
                    line = &line[..space];
                }
            }
            self.lines.push(line.trim_end().to_string());
            rest = rest[line.len()..].trim_start();
        }
        log::debug!("sample card laid out {} lines", self.lines.len());
        Ok(())
    }

    fn perform_paint(
        &mut self,
        g: &mut GraphicsAdapter<'_>,
        adapter: &RenderAdapter,
    ) -> rfpaint::Result<()> {
        let page = self
            .page
            .ok_or_else(|| rfpaint::Error::RenderError("page geometry not set".into()))?;
        let frame = RectF::from_origin_size(page.location, page.max_size);
        let font = adapter.create_font(adapter.default_family(), FONT_SIZE, FontStyle::REGULAR);
        let bold = adapter.create_font(
            adapter.default_family(),
            FONT_SIZE,
            FontStyle::BOLD | FontStyle::UNDERLINE,
        );

        let token = g.set_anti_alias_smoothing_mode();
        let mut path = g.get_graphics_path();
        let r = 8.0;
        path.start(frame.x, frame.y + r);
        path.arc_to(frame.x + r, frame.y, r, Corner::TopLeft);
        path.line_to(frame.right() - r, frame.y);
        path.arc_to(frame.right(), frame.y + r, r, Corner::TopRight);
        path.line_to(frame.right(), frame.bottom() - r);
        path.arc_to(frame.right() - r, frame.bottom(), r, Corner::BottomRight);
        path.line_to(frame.x + r, frame.bottom());
        path.arc_to(frame.x, frame.bottom() - r, r, Corner::BottomLeft);
        path.close();
        g.fill_path(&adapter.get_solid_brush(adapter.get_color("whitesmoke")), &path);
        g.draw_path(&adapter.get_pen(adapter.get_color("slategray")).with_width(1.5), &path);
        g.return_previous_smoothing_mode(Some(token));

        let bar = RectF::new(frame.x + r, frame.y + 1.0, frame.width - r * 2.0, BAR);
        g.push_clip(bar);
        let steel = adapter.get_color("steelblue");
        let gradient = adapter.get_linear_gradient_brush(bar, steel, Color::WHITE, 0.0);
        g.fill_rectangle(&gradient, bar.x, bar.y, bar.width, bar.height);
        let title = "rfpaint";
        let title_size = g.measure_string(title, &bold);
        g.draw_string(
            title,
            &bold,
            Color::WHITE,
            PointF::new(bar.x, bar.y + (BAR - title_size.height) / 2.0),
            title_size,
            TextDirection::LeftToRight,
        );
        g.pop_clip();

        let body = RectF::new(
            frame.x + PAD,
            frame.y + BAR + PAD,
            frame.width - PAD * 2.0,
            frame.height - BAR - PAD * 2.0,
        );
        g.push_clip(body);
        let line_height = font.height().unwrap_or(FONT_SIZE);
        let mut y = body.y;
        for line in &self.lines {
            let size = g.measure_string(line, &font);
            let at = PointF::new(body.x, y);
            g.draw_string(line, &font, Color::BLACK, at, size, TextDirection::LeftToRight);
            y += line_height;
        }
        if let Some(first) = self.lines.first() {
            y += line_height / 2.0;
            g.draw_line(&Pen::new(adapter.get_color("lightgray")), body.x, y, body.right(), y);
            y += line_height / 2.0;
            g.draw_string(
                first,
                &font,
                adapter.get_color("dimgray"),
                PointF::new(body.x, y),
                SizeF::new(body.width, line_height),
                TextDirection::RightToLeft,
            );
        }
        let swatch = [
            PointF::new(body.right() - 18.0, body.bottom() - 4.0),
            PointF::new(body.right() - 9.0, body.bottom() - 18.0),
            PointF::new(body.right(), body.bottom() - 4.0),
        ];
        g.fill_polygon(&Brush::Solid(adapter.get_color("tomato")), &swatch);
        g.pop_clip();
        Ok(())
    }
}
