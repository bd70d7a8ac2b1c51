use plotters::prelude::*;

pub struct PlottersPlotter{}

impl PlottersPlotter {
    pub fn create() -> anyhow::Result<PlottersPlotter> {
        Ok(PlottersPlotter{})
    }
}

impl forecast_lib::Plotter for PlottersPlotter {
    fn plot_lines(&mut self, y_points_list : &Vec<(String, Vec<f64>)>, title : &str, filename : &str) -> anyhow::Result<()> {
        let png_filename = format!("{}.png", filename);
        if let Some(parent_dir) = std::path::Path::new(&png_filename).parent() {
            if !parent_dir.as_os_str().is_empty() {
                std::fs::create_dir_all(parent_dir)?;
            }
        }

        let root_area =
            BitMapBackend::new(&png_filename, (1920, 1080)).into_drawing_area();
        root_area.fill(&WHITE)?;

        let root_area = root_area.titled(title, ("sans-serif", 18))?;

        let x_axis = (0.0..y_points_list[0].1.len() as f64).step(1.0);
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (_name, y_points) in y_points_list {
            for i in 0..y_points.len() {
                if y_points[i] < min_y {
                    min_y = y_points[i];
                }
                if y_points[i] > max_y {
                    max_y = y_points[i];
                }
            }
        }

        let mut cc = ChartBuilder::on(&root_area)
            .margin(5)
            .set_all_label_area_size(50)
            .build_cartesian_2d(0.0..y_points_list[0].1.len() as f64, min_y..max_y)?;

        cc.configure_mesh()
            .x_labels(20)
            .y_labels(10)
            .draw()?;

        for i in 0..y_points_list.len() {
            let (label, y_points) = &y_points_list[i];
            let color = PlottersPlotter::get_color(i);
            cc.draw_series(LineSeries::new(x_axis.values().map(|v| (v, y_points[v.floor() as usize])), &color))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        cc.configure_series_labels().border_style(&BLACK).draw()?;

        Ok(())
    }
}

impl PlottersPlotter {
    fn get_color(i: usize) -> RGBColor {
        let color = match i {
            0 => BLUE,
            1 => RED,
            2 => GREEN,
            3 => YELLOW,
            4 => CYAN,
            _ => MAGENTA
        };
        color
    }
}
