//! Terminal tables and the histogram artifact.

use std::path::Path;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use plotters::prelude::*;

use ao3_report::{profile_url, Category, Story, CHARACTER_SEPARATOR};

/// Print ranked stories as a table.
pub fn stories_table(stories: &[Story]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Title", "Rating", "Author", "Characters", "Words"]);

    for story in stories {
        table.add_row(vec![
            Cell::new(&story.title),
            Cell::new(
                story
                    .rating
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(story.author.as_deref().unwrap_or_default()),
            Cell::new(
                story
                    .characters
                    .as_deref()
                    .map(|c| c.join(CHARACTER_SEPARATOR))
                    .unwrap_or_default(),
            ),
            Cell::new(story.words.as_deref().unwrap_or_default()),
        ]);
    }

    println!("{table}");
}

/// Print a ranked frequency table. Authors get a derived profile link
/// column.
pub fn frequency_table(rows: &[(String, usize)], category: Category) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![
        Cell::new(category.to_string()),
        Cell::new("Frequency"),
    ];
    if category == Category::Authors {
        header.push(Cell::new("Author Link"));
    }
    table.set_header(header);

    for (key, count) in rows {
        let mut row = vec![Cell::new(key), Cell::new(count.to_string())];
        if category == Category::Authors {
            row.push(Cell::new(profile_url(key)));
        }
        table.add_row(row);
    }

    println!("{table}");
}

/// Draw a frequency bar chart into an SVG file, one bar per category key.
pub fn histogram(
    rows: &[(String, usize)],
    category: Category,
    output: &Path,
) -> Result<()> {
    let Some(max) = rows.iter().map(|r| r.1).max() else {
        anyhow::bail!("no {category} data to chart");
    };
    let max = max as i32;

    let root = SVGBackend::new(output, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Histogram of {category}"), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d(0..rows.len() as i32, 0..max + 1)?;

    chart
        .configure_mesh()
        .x_labels(rows.len())
        .x_label_formatter(&|i| {
            rows.get(*i as usize)
                .map(|(key, _)| key.clone())
                .unwrap_or_default()
        })
        .x_desc(category.to_string())
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, (_, count))| {
        Rectangle::new(
            [(i as i32, 0), (i as i32 + 1, *count as i32)],
            // The original report's "skyblue".
            RGBColor(135, 206, 235).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
