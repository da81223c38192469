use super::section::{Portfolio, Section};
use crate::models::{About, Certification, Education, Experience, Project};

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the whole page as a static HTML document.
pub fn render_page(page: &Portfolio) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} | Portfolio</title>\n",
        escape(&page.about.data.name)
    ));
    html.push_str("</head>\n<body>\n");

    html.push_str(&about_section(&page.about));
    html.push_str(&list_section("education", "Education", &page.education, education_item));
    html.push_str(&list_section("experience", "Experience", &page.experience, experience_item));
    html.push_str(&list_section(
        "certifications",
        "Certifications",
        &page.certifications,
        certification_item,
    ));
    html.push_str(&list_section("projects", "Projects", &page.projects, project_item));
    html.push_str(CONTACT_SECTION);

    html.push_str("</body>\n</html>\n");
    html
}

fn section_open(id: &str, section_source: &str) -> String {
    format!("<section id=\"{id}\" data-source=\"{section_source}\">\n")
}

fn about_section(section: &Section<About>) -> String {
    let about = &section.data;
    let mut html = section_open("about", section.source.as_str());
    if let Some(url) = &about.photo_url {
        html.push_str(&format!(
            "<img class=\"photo\" src=\"{}\" alt=\"{}\">\n",
            escape(url),
            escape(&about.name)
        ));
    }
    html.push_str(&format!("<h1>{}</h1>\n", escape(&about.name)));
    html.push_str(&format!("<h2>{}</h2>\n", escape(&about.title)));
    html.push_str(&format!("<p>{}</p>\n", escape(&about.bio)));
    html.push_str(&tags("skills", &about.skills));
    html.push_str("</section>\n");
    html
}

fn list_section<T>(
    id: &str,
    heading: &str,
    section: &Section<Vec<T>>,
    item: fn(&T) -> String,
) -> String {
    let mut html = section_open(id, section.source.as_str());
    html.push_str(&format!("<h2>{heading}</h2>\n"));
    for entry in &section.data {
        html.push_str("<article>\n");
        html.push_str(&item(entry));
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");
    html
}

fn tags(class: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<ul class=\"{class}\">");
    for item in items {
        html.push_str(&format!("<li>{}</li>", escape(item)));
    }
    html.push_str("</ul>\n");
    html
}

fn logo(url: &Option<String>, alt: &str) -> String {
    match url {
        Some(url) => format!(
            "<img class=\"logo\" src=\"{}\" alt=\"{}\">\n",
            escape(url),
            escape(alt)
        ),
        None => String::new(),
    }
}

fn link(url: &Option<String>, label: &str) -> String {
    match url {
        Some(url) => format!("<a href=\"{}\">{label}</a>\n", escape(url)),
        None => String::new(),
    }
}

fn education_item(e: &Education) -> String {
    let mut html = logo(&e.logo_url, &e.institution);
    html.push_str(&format!("<h3>{}</h3>\n", escape(&e.degree)));
    html.push_str(&format!("<p class=\"org\">{}</p>\n", escape(&e.institution)));
    if let Some(location) = &e.location {
        html.push_str(&format!("<p class=\"location\">{}</p>\n", escape(location)));
    }
    html.push_str(&format!(
        "<p class=\"dates\">{} - {}</p>\n",
        escape(&e.start_date),
        escape(&e.end_date)
    ));
    if let Some(description) = &e.description {
        html.push_str(&format!("<p>{}</p>\n", escape(description)));
    }
    html
}

fn experience_item(e: &Experience) -> String {
    let mut html = logo(&e.logo_url, &e.company);
    html.push_str(&format!("<h3>{}</h3>\n", escape(&e.title)));
    html.push_str(&format!(
        "<p class=\"org\">{} · {}</p>\n",
        escape(&e.company),
        escape(&e.location)
    ));
    html.push_str(&format!(
        "<p class=\"dates\">{} - {}</p>\n",
        escape(&e.start_date),
        escape(&e.end_date)
    ));
    if let Some(description) = &e.description {
        html.push_str(&format!("<p>{}</p>\n", escape(description)));
    }
    html.push_str(&tags("responsibilities", &e.responsibilities));
    html
}

fn certification_item(c: &Certification) -> String {
    let mut html = logo(&c.logo_url, &c.issuer);
    html.push_str(&format!("<h3>{}</h3>\n", escape(&c.title)));
    html.push_str(&format!("<p class=\"org\">{}</p>\n", escape(&c.issuer)));
    let dates = match &c.expiry_date {
        Some(expiry) => format!("Issued {} · Expires {}", escape(&c.issue_date), escape(expiry)),
        None => format!("Issued {}", escape(&c.issue_date)),
    };
    html.push_str(&format!("<p class=\"dates\">{dates}</p>\n"));
    if let Some(id) = &c.credential_id {
        html.push_str(&format!("<p class=\"credential\">Credential ID {}</p>\n", escape(id)));
    }
    html.push_str(&link(&c.credential_url, "Show credential"));
    html.push_str(&tags("skills", &c.skills));
    html
}

fn project_item(p: &Project) -> String {
    let mut html = String::new();
    if let Some(url) = &p.image_url {
        html.push_str(&format!(
            "<img class=\"cover\" src=\"{}\" alt=\"{}\">\n",
            escape(url),
            escape(&p.title)
        ));
    }
    let badge = if p.featured { " <span class=\"featured\">Featured</span>" } else { "" };
    html.push_str(&format!("<h3>{}{badge}</h3>\n", escape(&p.title)));
    html.push_str(&format!("<p>{}</p>\n", escape(&p.description)));
    html.push_str(&tags("technologies", &p.technologies));
    html.push_str(&link(&p.github_url, "Code"));
    html.push_str(&link(&p.live_url, "Live demo"));
    html
}

const CONTACT_SECTION: &str = r#"<section id="contact">
<h2>Get In Touch</h2>
<form id="contact-form" action="/api/v1/contact" method="post">
<input name="name" placeholder="Your name" required>
<input name="email" type="email" placeholder="Your email" required>
<input name="subject" placeholder="Subject" required>
<textarea name="message" placeholder="Your message" required></textarea>
<input name="botcheck" type="checkbox" style="display:none" tabindex="-1" autocomplete="off">
<button type="submit">Send Message</button>
<p id="contact-notice"></p>
</form>
<script>
document.getElementById("contact-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const form = event.target;
  const body = Object.fromEntries(new FormData(form));
  body.botcheck = form.botcheck.checked;
  const res = await fetch(form.action, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  const outcome = await res.json();
  document.getElementById("contact-notice").textContent = outcome.notice.description;
  if (res.ok) form.reset();
});
</script>
</section>
"#;
