// src/config.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::usuarios::usuario_structs::Rol;

/// Backend de almacenamiento elegido al arrancar. Son excluyentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoAlmacen {
    Memoria,
    Archivo,
    Postgres,
}

/// Credencial estática definida en el archivo de configuración.
#[derive(Debug, Clone, Deserialize)]
pub struct CredencialEstatica {
    pub nombre: String,
    pub clave: String,
    pub rol: Rol,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuracion {
    pub bind: String,
    pub almacen: TipoAlmacen,
    pub directorio_datos: PathBuf,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_horas: i64,
    pub bcrypt_costo: u32,
    pub nombre_negocio: String,
    pub logo: Option<PathBuf>,
    pub directorio_fuentes: PathBuf,
    pub usuarios: Vec<CredencialEstatica>,
}

impl Default for Configuracion {
    fn default() -> Self {
        Configuracion {
            bind: "127.0.0.1:8080".to_string(),
            almacen: TipoAlmacen::Memoria,
            directorio_datos: PathBuf::from("datos"),
            database_url: None,
            jwt_secret: "clave_secreta_para_pruebas_123".to_string(),
            jwt_horas: 12,
            bcrypt_costo: bcrypt::DEFAULT_COST,
            nombre_negocio: "Gigantografías".to_string(),
            logo: None,
            directorio_fuentes: PathBuf::from("fuentes"),
            usuarios: vec![CredencialEstatica {
                nombre: "admin".to_string(),
                clave: "admin".to_string(),
                rol: Rol::Administrador,
            }],
        }
    }
}

impl Configuracion {
    /// Lee el TOML indicado por `BANNERS_CONFIG` (por defecto `banners.toml`)
    /// y aplica las variables de entorno encima. Si el archivo no existe se
    /// usan los valores por defecto.
    pub fn cargar() -> Result<Self, String> {
        let ruta = std::env::var("BANNERS_CONFIG").unwrap_or_else(|_| "banners.toml".to_string());

        let mut config = match std::fs::read_to_string(&ruta) {
            Ok(contenido) => Self::desde_toml(&contenido)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(ruta = %ruta, "sin archivo de configuración, usando valores por defecto");
                Configuracion::default()
            }
            Err(e) => return Err(format!("No se pudo leer {}: {}", ruta, e)),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }
        if let Ok(secreto) = std::env::var("JWT_SECRET") {
            config.jwt_secret = secreto;
        }
        if let Ok(bind) = std::env::var("BANNERS_BIND") {
            config.bind = bind;
        }

        Ok(config)
    }

    pub fn desde_toml(contenido: &str) -> Result<Self, String> {
        toml::from_str(contenido).map_err(|e| format!("Configuración inválida: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valores_por_defecto_usan_memoria_y_un_admin() {
        let config = Configuracion::default();
        assert_eq!(config.almacen, TipoAlmacen::Memoria);
        assert_eq!(config.usuarios.len(), 1);
        assert_eq!(config.usuarios[0].rol, Rol::Administrador);
    }

    #[test]
    fn toml_parcial_conserva_los_demas_valores() {
        let config = Configuracion::desde_toml(
            r#"
            almacen = "archivo"
            directorio_datos = "/tmp/banners"

            [[usuarios]]
            nombre = "maria"
            clave = "1234"
            rol = "vendedor"
            "#,
        )
        .unwrap();

        assert_eq!(config.almacen, TipoAlmacen::Archivo);
        assert_eq!(config.directorio_datos, PathBuf::from("/tmp/banners"));
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.usuarios[0].nombre, "maria");
        assert_eq!(config.usuarios[0].rol, Rol::Vendedor);
    }

    #[test]
    fn toml_invalido_es_error() {
        assert!(Configuracion::desde_toml("almacen = \"nube\"").is_err());
    }
}
