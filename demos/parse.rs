use std::io;

use eml_stream::MimePart;

fn print_part(part: &MimePart, path: &mut Vec<usize>) {
    let section = match path.is_empty() {
        true => "root".to_string(),
        false => path
            .iter()
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join("."),
    };
    let size = part.as_leaf().map(|l| l.raw().len());
    println!(
        "{:<indent$}{} {} {}{}",
        "",
        section,
        part.content_type.essence(),
        part.encoding,
        size.map(|s| format!(" ({} bytes)", s)).unwrap_or_default(),
        indent = path.len() * 2,
    );

    for (i, child) in part.children().iter().enumerate() {
        path.push(i);
        print_part(child, path);
        path.pop();
    }
}

fn main() -> Result<(), eml_stream::Error> {
    let result = eml_stream::parse(io::stdin().lock())?;

    if let Some(subject) = result.root.subject() {
        println!("subject: {}", subject);
    }
    print_part(&result.root, &mut vec![]);

    for warning in result.warnings.iter() {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
