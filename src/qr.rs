use qrcode::render::svg;
use qrcode::QrCode;

/// Public URL of the registration form. An explicit base (the `PUBLIC_URL`
/// environment variable) wins, for deployments behind NAT or a reverse
/// proxy; otherwise the bound host and port are used directly.
pub fn registration_url(public_base: Option<&str>, host: &str, port: u16) -> String {
    match public_base {
        Some(base) => format!("{}/register", base.trim_end_matches('/')),
        None => format!("http://{host}:{port}/register"),
    }
}

pub fn qr_svg(url: &str) -> anyhow::Result<String> {
    let code = QrCode::new(url.as_bytes())?;
    Ok(code.render::<svg::Color>().min_dimensions(400, 400).build())
}
