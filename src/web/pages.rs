//! Static HTML pages served by the web service.

const HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>LSB Steganography</title>
</head>
<body>
  <nav><a href="/">Home</a> | <a href="/encode">Encode</a> | <a href="/decode">Decode</a> | <a href="/about">About</a></nav>
"#;

const FOOTER: &str = "</body>\n</html>\n";

const INDEX_BODY: &str = r#"  <h1>LSB Steganography</h1>
  <p>Hide a text message inside the pixels of an image, or recover a message hidden in one.</p>
  <ul>
    <li><a href="/encode">Encode a message</a></li>
    <li><a href="/decode">Decode a message</a></li>
  </ul>
"#;

const ENCODE_BODY: &str = r#"  <h1>Encode</h1>
  <form method="post" action="/encode" enctype="multipart/form-data">
    <p><label>Image (PNG or JPEG): <input type="file" name="file" accept=".png,.jpg,.jpeg,.jpe"></label></p>
    <p><label>Message:<br><textarea name="message" rows="8" cols="60"></textarea></label></p>
    <p><button type="submit">Encode</button></p>
  </form>
"#;

const DECODE_BODY: &str = r#"  <h1>Decode</h1>
  <form method="post" action="/decode" enctype="multipart/form-data">
    <p><label>Encoded image (PNG): <input type="file" name="file" accept=".png"></label></p>
    <p><button type="submit">Decode</button></p>
  </form>
"#;

const ABOUT_BODY: &str = r#"  <h1>About</h1>
  <p>The message is wrapped in <code>$$$$$</code> markers and written into the least
  significant bit of every color sample. The encoded image is always a PNG: saving it
  in any lossy format destroys the message.</p>
"#;

fn page(body: &str) -> String {
    format!("{}{}{}", HEADER, body, FOOTER)
}

pub fn index() -> String {
    page(INDEX_BODY)
}

pub fn encode() -> String {
    page(ENCODE_BODY)
}

pub fn decode() -> String {
    page(DECODE_BODY)
}

pub fn about() -> String {
    page(ABOUT_BODY)
}
