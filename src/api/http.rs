use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ApiError;

/// One connection carries one request; responses always close the socket.
pub(super) struct HttpRequest {
    pub(super) method: String,
    pub(super) path: String,
    pub(super) body: Vec<u8>,
}

pub(super) struct HttpResponse {
    pub(super) status: u16,
    pub(super) content_type: &'static str,
    pub(super) body: Vec<u8>,
}

pub(super) async fn read_request(socket: &mut TcpStream) -> Result<HttpRequest, ApiError> {
    const MAX_REQUEST_BYTES: usize = 1024 * 1024;
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|source| ApiError::RequestRead { source })?;
        if bytes == 0 {
            return Err(ApiError::MalformedRequest {
                reason: "Empty request",
            });
        }
        let read_slice = chunk.get(..bytes).ok_or(ApiError::MalformedRequest {
            reason: "Invalid read length",
        })?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(ApiError::RequestTooLarge);
        }
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
    }

    let header_bytes = buffer.get(..header_end).ok_or(ApiError::MalformedRequest {
        reason: "Malformed request headers",
    })?;
    let header_text = std::str::from_utf8(header_bytes).map_err(|_| ApiError::MalformedRequest {
        reason: "Invalid request encoding",
    })?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines.next().ok_or(ApiError::MalformedRequest {
        reason: "Missing request line",
    })?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or(ApiError::MalformedRequest {
        reason: "Missing HTTP method",
    })?;
    let target = parts.next().ok_or(ApiError::MalformedRequest {
        reason: "Missing request path",
    })?;
    // Route matching works on the path alone; the query component is not
    // part of any endpoint's identity.
    let path = target.split('?').next().unwrap_or(target);

    let mut content_length = 0usize;
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ApiError::MalformedRequest {
                reason: "Malformed header",
            });
        };
        if key.trim().eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse::<usize>().unwrap_or(0);
        }
    }

    let body_start = header_end
        .checked_add(4)
        .ok_or(ApiError::MalformedRequest {
            reason: "Malformed request headers",
        })?;
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|source| ApiError::RequestRead { source })?;
        if bytes == 0 {
            break;
        }
        let read_slice = chunk.get(..bytes).ok_or(ApiError::MalformedRequest {
            reason: "Invalid read length",
        })?;
        body.extend_from_slice(read_slice);
        if body.len() > MAX_REQUEST_BYTES {
            return Err(ApiError::RequestTooLarge);
        }
    }
    body.truncate(content_length);

    Ok(HttpRequest {
        method: method.to_owned(),
        path: path.to_owned(),
        body,
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

pub(super) async fn write_response(
    socket: &mut TcpStream,
    response: &HttpResponse,
) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        status_text(response.status),
        response.content_type,
        response.body.len()
    );
    socket.write_all(head.as_bytes()).await?;
    socket.write_all(&response.body).await?;
    socket.flush().await
}
