//! Notification texts keyed by method, status and path

use super::classifier::Access;
use super::error::ClientError;
use super::notify::Notification;
use reqwest::{Method, StatusCode};

/// Notification for a successful response, `None` for reads
pub fn success_notification(
    method: &Method,
    path: &str,
    status: StatusCode,
    server_message: Option<&str>,
) -> Option<Notification> {
    let created = matches!(status, StatusCode::OK | StatusCode::CREATED);

    if *method == Method::POST && created && path.contains("register") {
        return Some(Notification::success(
            "Registrasi Berhasil",
            "Akun berhasil dibuat. Silakan masuk dengan akun Anda.",
        ));
    }
    if *method == Method::POST && created && path.contains("login") {
        return Some(Notification::success(
            "Login Berhasil",
            "Selamat datang kembali!",
        ));
    }

    let fallback = match *method {
        Method::POST => "Data berhasil disimpan.",
        Method::PUT | Method::PATCH => "Data berhasil diperbarui.",
        Method::DELETE => "Data berhasil dihapus.",
        _ => return None,
    };
    Some(Notification::success(
        "Berhasil",
        server_message.unwrap_or(fallback),
    ))
}

/// Notification for a failed request. `access` picks the 401 wording.
pub fn error_notification(error: &ClientError, access: Access) -> Option<Notification> {
    let message = |fallback: &str| error.server_message().unwrap_or(fallback).to_string();

    let notification = match error {
        ClientError::BadRequest { .. } => Notification::error(
            "Permintaan Tidak Valid",
            message("Data yang dikirim tidak valid."),
        ),
        ClientError::Unauthorized { .. } => match access {
            Access::Public => Notification::error(
                "Login Gagal",
                message("Email atau kata sandi salah."),
            ),
            Access::Private => Notification::warning(
                "Sesi Berakhir",
                "Sesi Anda telah berakhir. Silakan login kembali.",
            ),
        },
        ClientError::Forbidden { .. } => Notification::error(
            "Akses Ditolak",
            "Anda tidak memiliki izin untuk mengakses fitur ini.",
        ),
        ClientError::NotFound { .. } => Notification::error(
            "Tidak Ditemukan",
            message("Data yang diminta tidak ditemukan."),
        ),
        ClientError::Conflict { .. } => Notification::warning(
            "Data Sudah Ada",
            message("Data yang sama sudah terdaftar."),
        ),
        ClientError::Validation { message, .. } => {
            Notification::error("Validasi Gagal", message.clone())
        }
        ClientError::RateLimited { .. } => Notification::warning(
            "Terlalu Banyak Permintaan",
            "Silakan tunggu beberapa saat sebelum mencoba lagi.",
        ),
        ClientError::Server { .. } => Notification::error(
            "Kesalahan Server",
            "Terjadi kesalahan pada server. Silakan coba lagi nanti.",
        ),
        ClientError::ServiceUnavailable { .. } => Notification::error(
            "Layanan Tidak Tersedia",
            "Server sedang dalam pemeliharaan. Silakan coba lagi nanti.",
        ),
        ClientError::Status { .. } => Notification::error(
            "Terjadi Kesalahan",
            message("Terjadi kesalahan yang tidak terduga."),
        ),
        ClientError::Network(_) => Notification::error(
            "Koneksi Gagal",
            "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.",
        ),
        ClientError::Timeout(_) => Notification::error(
            "Waktu Habis",
            "Server tidak merespons dalam batas waktu. Silakan coba lagi.",
        ),
        ClientError::Request(_) => Notification::error(
            "Permintaan Gagal",
            "Permintaan tidak dapat dikirim. Silakan muat ulang halaman.",
        ),
        ClientError::Cancelled
        | ClientError::Decode(_)
        | ClientError::Configuration(_)
        | ClientError::Credentials(_)
        | ClientError::InvalidMonitoringCode(_) => return None,
    };

    Some(notification)
}
