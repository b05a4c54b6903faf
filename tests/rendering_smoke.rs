use rfpaint::{
    render_to_image, render_to_png, Brush, Color, Error, FontStyle, GraphicsAdapter, HtmlContainer,
    PageGeometry, PointF, RenderAdapter, RenderOptions, TextDirection, Viewport,
};

/// Paints each input line as a text run inside the page margins.
#[derive(Default)]
struct LineContainer {
    page: Option<PageGeometry>,
    lines: Vec<String>,
    measured: Vec<f64>,
}

impl HtmlContainer for LineContainer {
    fn set_html(&mut self, html: &str, _adapter: &RenderAdapter) -> rfpaint::Result<()> {
        self.lines = html.lines().map(str::to_string).collect();
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
        let font = adapter.create_font("Arial", 12.0, FontStyle::REGULAR);
        self.measured = self.lines.iter().map(|l| g.measure_string(l, &font).width).collect();
        Ok(())
    }

    fn perform_paint(
        &mut self,
        g: &mut GraphicsAdapter<'_>,
        adapter: &RenderAdapter,
    ) -> rfpaint::Result<()> {
        let page = self.page.expect("page set before paint");
        let font = adapter.create_font("Arial", 12.0, FontStyle::REGULAR);
        let height = font.height().expect("measured during layout");
        g.fill_rectangle(
            &Brush::Solid(Color::from_rgb(250, 250, 210)),
            page.location.x,
            page.location.y,
            page.max_size.width,
            page.max_size.height,
        );
        for (i, line) in self.lines.iter().enumerate() {
            let at = PointF::new(page.location.x, page.location.y + i as f64 * height);
            let size = g.measure_string(line, &font);
            g.draw_string(line, &font, Color::BLACK, at, size, TextDirection::LeftToRight);
        }
        Ok(())
    }
}

fn options() -> RenderOptions {
    RenderOptions {
        viewport: Viewport { width: 120, height: 60 },
        margin: 5,
        background: Color::from_rgb(0, 0, 64),
        ..Default::default()
    }
}

#[test]
fn smoke_render_to_image() {
    let adapter = RenderAdapter::default();
    let mut c = LineContainer::default();
    let img = render_to_image("one\ntwo", &options(), &adapter, &mut c)
        .unwrap()
        .expect("non-blank input renders");
    assert_eq!((img.width(), img.height()), (120, 60));
    assert_eq!(c.measured, vec![24.0, 24.0]);

    // margin keeps the background
    let px = img.pixel(1, 1).unwrap();
    assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 64));
    // content area is filled by the container
    let px = img.pixel(100, 50).unwrap();
    assert_eq!((px.red(), px.green(), px.blue()), (250, 250, 210));
    // first glyph of the first line
    let px = img.pixel(8, 12).unwrap();
    assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 0));
}

#[test]
fn smoke_render_to_png() {
    let adapter = RenderAdapter::default();
    let shot = render_to_png("hello", &options(), &adapter, &mut LineContainer::default())
        .unwrap()
        .unwrap();
    assert_eq!((shot.width, shot.height), (120, 60));
    assert_eq!(&shot.png_data[1..4], b"PNG");
}

#[test]
fn render_rejects_transparent_background() {
    let adapter = RenderAdapter::default();
    let opts = RenderOptions {
        background: Color::TRANSPARENT,
        ..options()
    };
    let err = render_to_image("x", &opts, &adapter, &mut LineContainer::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidBackground(_)));
}

#[test]
fn blank_input_yields_no_image() {
    let adapter = RenderAdapter::default();
    assert!(render_to_image("", &options(), &adapter, &mut LineContainer::default())
        .unwrap()
        .is_none());
}
