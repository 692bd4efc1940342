// src/almacen/tablas.rs

//! Operaciones sobre tablas en memoria. Las usan tanto el almacén en
//! memoria como el de archivos, que persiste estas mismas tablas en CSV.
//! Cada operación valida antes de modificar, así un error no deja cambios a medias.

use chrono::{DateTime, NaiveDate, Utc};

use crate::cierres::calculo::{resumir, ventas_cerrables};
use crate::cierres::cierres_structs::{CierreCaja, ResumenCierre};
use crate::shared::error::{ErrorApp, Resultado};
use crate::usuarios::usuario_structs::{Usuario, UsuarioNuevo};
use crate::ventas::ventas_structs::{Pago, PagoNuevo, Venta};

#[derive(Debug, Clone, Default)]
pub struct Tablas {
    pub ventas: Vec<Venta>,
    pub pagos: Vec<Pago>,
    pub cierres: Vec<CierreCaja>,
    pub usuarios: Vec<Usuario>,
}

fn siguiente_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl Tablas {
    fn posicion_abierta(&self, id: i64) -> Resultado<usize> {
        let pos = self
            .ventas
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| ErrorApp::no_encontrada(id))?;
        if self.ventas[pos].cerrado {
            return Err(ErrorApp::Conflicto(format!(
                "La venta {} ya fue incluida en un cierre de caja.",
                id
            )));
        }
        Ok(pos)
    }

    fn agregar_pago(&mut self, venta_id: i64, nuevo: PagoNuevo) -> Pago {
        let id = siguiente_id(self.pagos.iter().map(|p| p.id));
        let pago = Pago::desde_nuevo(id, venta_id, nuevo);
        self.pagos.push(pago.clone());
        pago
    }

    pub fn insertar_venta(&mut self, mut venta: Venta, adelanto: Option<PagoNuevo>) -> Venta {
        venta.id = siguiente_id(self.ventas.iter().map(|v| v.id));
        self.ventas.push(venta.clone());
        if let Some(pago) = adelanto {
            self.agregar_pago(venta.id, pago);
        }
        venta
    }

    pub fn listar_ventas(&self, usuario: Option<&str>) -> Vec<Venta> {
        self.ventas
            .iter()
            .filter(|v| usuario.map_or(true, |u| v.usuario == u))
            .cloned()
            .collect()
    }

    pub fn obtener_venta(&self, id: i64) -> Option<Venta> {
        self.ventas.iter().find(|v| v.id == id).cloned()
    }

    pub fn marcar_entregada(&mut self, id: i64) -> Resultado<Venta> {
        let pos = self.posicion_abierta(id)?;
        self.ventas[pos].marcar_entregada()?;
        Ok(self.ventas[pos].clone())
    }

    pub fn registrar_pago(&mut self, venta_id: i64, mut pago: PagoNuevo) -> Resultado<(Venta, Pago)> {
        let pos = self.posicion_abierta(venta_id)?;
        let mut venta = self.ventas[pos].clone();
        pago.monto = venta.cuenta.abonar(&pago.monto)?;
        self.ventas[pos] = venta.clone();
        Ok((venta, self.agregar_pago(venta_id, pago)))
    }

    pub fn eliminar_venta(&mut self, id: i64) -> Resultado<()> {
        let pos = self.posicion_abierta(id)?;
        self.ventas.remove(pos);
        self.pagos.retain(|p| p.venta_id != id);
        Ok(())
    }

    pub fn listar_pagos(&self, venta_id: i64) -> Vec<Pago> {
        self.pagos
            .iter()
            .filter(|p| p.venta_id == venta_id)
            .cloned()
            .collect()
    }

    pub fn pagos_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Vec<Pago> {
        self.pagos
            .iter()
            .filter(|p| p.creado_en >= desde && p.creado_en < hasta)
            .cloned()
            .collect()
    }

    pub fn ventas_entre(&self, desde: DateTime<Utc>, hasta: DateTime<Utc>) -> Vec<Venta> {
        self.ventas
            .iter()
            .filter(|v| v.creado_en >= desde && v.creado_en < hasta)
            .cloned()
            .collect()
    }

    pub fn vista_previa_cierre(&self) -> Option<ResumenCierre> {
        resumir(ventas_cerrables(&self.ventas), &self.pagos)
    }

    pub fn cerrar_caja(
        &mut self,
        usuario: &str,
        fecha: NaiveDate,
        ahora: DateTime<Utc>,
    ) -> Option<CierreCaja> {
        let resumen = self.vista_previa_cierre()?;

        let cierre = CierreCaja {
            id: siguiente_id(self.cierres.iter().map(|c| c.id)),
            fecha,
            ventas_ids: resumen.ventas_ids.clone(),
            total_general: resumen.total_general,
            subtotales: resumen.subtotales,
            cantidad_ventas: resumen.ventas_ids.len() as i64,
            usuario: usuario.to_string(),
            creado_en: ahora,
        };

        for venta in self
            .ventas
            .iter_mut()
            .filter(|v| resumen.ventas_ids.contains(&v.id))
        {
            venta.cerrado = true;
            venta.cierre_id = Some(cierre.id);
        }
        self.cierres.push(cierre.clone());
        Some(cierre)
    }

    pub fn buscar_usuario(&self, nombre: &str) -> Option<Usuario> {
        self.usuarios.iter().find(|u| u.nombre == nombre).cloned()
    }

    pub fn crear_usuario(&mut self, nuevo: UsuarioNuevo) -> Resultado<Usuario> {
        if self.usuarios.iter().any(|u| u.nombre == nuevo.nombre) {
            return Err(ErrorApp::Conflicto(format!(
                "El usuario {} ya existe.",
                nuevo.nombre
            )));
        }
        let usuario = Usuario {
            id: siguiente_id(self.usuarios.iter().map(|u| u.id)),
            nombre: nuevo.nombre,
            clave_hash: nuevo.clave_hash,
            rol: nuevo.rol,
        };
        self.usuarios.push(usuario.clone());
        Ok(usuario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use bigdecimal::{BigDecimal, Zero};

    use crate::precios::precios_structs::{Acabado, Diseno, Material};
    use crate::ventas::ventas_structs::{MetodoPago, NuevaVenta};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn registrar(tablas: &mut Tablas, usuario: &str, adelanto: &str) -> Venta {
        let datos = NuevaVenta {
            cliente: "Bodega Sara".to_string(),
            ancho: dec("1.60"),
            alto: dec("2.00"),
            diseno: Diseno::SinDiseno,
            material: Material::Lona8oz,
            acabado: Acabado::SinAcabado,
            detalle: None,
            adelanto: Some(dec(adelanto)),
            metodo_pago: MetodoPago::Efectivo,
            entregado: false,
        };
        let (venta, pago) = Venta::nueva(&datos, usuario, Utc::now()).unwrap();
        tablas.insertar_venta(venta, pago)
    }

    fn dejar_cerrable(tablas: &mut Tablas, id: i64, metodo: MetodoPago) {
        let mut venta = tablas.marcar_entregada(id).unwrap();
        if let Some(p) = venta.completar_pago(Some(metodo), "admin", Utc::now()).unwrap() {
            tablas.registrar_pago(id, p).unwrap();
        }
    }

    fn suma_pagos(tablas: &Tablas, id: i64) -> BigDecimal {
        tablas
            .listar_pagos(id)
            .iter()
            .fold(BigDecimal::from(0), |acc, p| acc + &p.monto)
    }

    #[test]
    fn asigna_ids_secuenciales_y_guarda_el_adelanto() {
        let mut tablas = Tablas::default();
        let a = registrar(&mut tablas, "maria", "10");
        let b = registrar(&mut tablas, "jose", "0");
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(tablas.listar_pagos(1).len(), 1);
        assert!(tablas.listar_pagos(2).is_empty());
        assert_eq!(tablas.listar_ventas(Some("jose")).len(), 1);
        assert_eq!(tablas.listar_ventas(None).len(), 2);
    }

    #[test]
    fn cierre_marca_ventas_y_no_las_vuelve_a_contar() {
        let mut tablas = Tablas::default();
        registrar(&mut tablas, "maria", "10");
        registrar(&mut tablas, "maria", "0");
        registrar(&mut tablas, "maria", "0");
        dejar_cerrable(&mut tablas, 1, MetodoPago::Yape);
        dejar_cerrable(&mut tablas, 2, MetodoPago::Efectivo);

        let hoy = Utc::now().date_naive();
        let cierre = tablas.cerrar_caja("admin", hoy, Utc::now()).unwrap();
        assert_eq!(cierre.cantidad_ventas, 2);
        assert_eq!(cierre.ventas_ids, vec![1, 2]);
        assert_eq!(cierre.total_general, dec("83.20"));
        assert_eq!(cierre.subtotales[&MetodoPago::Efectivo], dec("51.60"));
        assert_eq!(cierre.subtotales[&MetodoPago::Yape], dec("31.60"));

        let venta = tablas.obtener_venta(1).unwrap();
        assert!(venta.cerrado);
        assert_eq!(venta.cierre_id, Some(cierre.id));
        assert!(!tablas.obtener_venta(3).unwrap().cerrado);

        // Un segundo cierre no encuentra nada
        assert!(tablas.cerrar_caja("admin", hoy, Utc::now()).is_none());
        assert_eq!(tablas.cierres.len(), 1);
    }

    #[test]
    fn ventas_cerradas_no_se_modifican_ni_se_borran() {
        let mut tablas = Tablas::default();
        registrar(&mut tablas, "maria", "0");
        dejar_cerrable(&mut tablas, 1, MetodoPago::Plin);
        tablas.cerrar_caja("admin", Utc::now().date_naive(), Utc::now()).unwrap();

        assert!(matches!(tablas.marcar_entregada(1), Err(ErrorApp::Conflicto(_))));
        let pago = PagoNuevo {
            monto: dec("1"),
            metodo: MetodoPago::Efectivo,
            usuario: "admin".to_string(),
            creado_en: Utc::now(),
        };
        assert!(matches!(tablas.registrar_pago(1, pago), Err(ErrorApp::Conflicto(_))));
        assert!(matches!(tablas.eliminar_venta(1), Err(ErrorApp::Conflicto(_))));
    }

    #[test]
    fn entregar_con_copia_vieja_no_revierte_un_pago() {
        let mut tablas = Tablas::default();
        registrar(&mut tablas, "maria", "10");

        // Dos lecturas de la misma venta antes de cualquier cambio
        let mut copia_a = tablas.obtener_venta(1).unwrap();
        let mut copia_b = tablas.obtener_venta(1).unwrap();

        let pago = copia_a.completar_pago(None, "maria", Utc::now()).unwrap().unwrap();
        tablas.registrar_pago(1, pago).unwrap();
        copia_b.marcar_entregada().unwrap();
        tablas.marcar_entregada(copia_b.id).unwrap();

        let venta = tablas.obtener_venta(1).unwrap();
        assert!(venta.cuenta.saldo().is_zero());
        assert_eq!(venta.cuenta.pagado(), &suma_pagos(&tablas, 1));
        assert!(venta.es_cerrable());
    }

    #[test]
    fn abonos_con_copias_viejas_no_pagan_de_mas() {
        let mut tablas = Tablas::default();
        registrar(&mut tablas, "maria", "10");

        // Saldo 31.60: cada copia cree que puede abonar 20
        let mut copia_a = tablas.obtener_venta(1).unwrap();
        let mut copia_b = tablas.obtener_venta(1).unwrap();
        let pago_a = copia_a.abonar(dec("20"), MetodoPago::Yape, "maria", Utc::now()).unwrap();
        let pago_b = copia_b.abonar(dec("20"), MetodoPago::Plin, "maria", Utc::now()).unwrap();

        tablas.registrar_pago(1, pago_a).unwrap();
        assert!(matches!(tablas.registrar_pago(1, pago_b), Err(ErrorApp::Validacion(_))));

        let venta = tablas.obtener_venta(1).unwrap();
        assert_eq!(venta.cuenta.saldo(), &dec("11.60"));
        assert_eq!(venta.cuenta.pagado(), &suma_pagos(&tablas, 1));
        assert_eq!(tablas.listar_pagos(1).len(), 2);
    }

    #[test]
    fn eliminar_borra_tambien_los_pagos() {
        let mut tablas = Tablas::default();
        registrar(&mut tablas, "maria", "5");
        tablas.eliminar_venta(1).unwrap();
        assert!(tablas.ventas.is_empty());
        assert!(tablas.pagos.is_empty());
        assert!(matches!(tablas.eliminar_venta(1), Err(ErrorApp::NoEncontrado(_))));
    }

    #[test]
    fn usuarios_no_se_duplican() {
        let mut tablas = Tablas::default();
        let nuevo = UsuarioNuevo {
            nombre: "rosa".to_string(),
            clave_hash: "x".to_string(),
            rol: crate::usuarios::usuario_structs::Rol::Vendedor,
        };
        assert_eq!(tablas.crear_usuario(nuevo.clone()).unwrap().id, 1);
        assert!(matches!(tablas.crear_usuario(nuevo), Err(ErrorApp::Conflicto(_))));
        assert!(tablas.buscar_usuario("rosa").is_some());
    }
}
